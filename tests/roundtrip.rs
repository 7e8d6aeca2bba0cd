use numtext::{
    format_decimal, format_guid, parse_decimal, parse_guid, BigUnsigned, Decimal, NumberCodec,
    ParseError, ParseErrorKind, Uuid,
};
use proptest::prelude::*;

const RADICES: [u32; 5] = [2, 8, 16, 36, 64];

/// Largest 96-bit mantissa
const MAX_MANTISSA: i128 = (1 << 96) - 1;

// =============================================================================
// Fixed cases
// =============================================================================

#[test]
fn test_u64_overflow_boundary() {
    let c = NumberCodec::decimal();
    assert_eq!(c.parse_u64("18446744073709551615"), Ok(u64::MAX));
    let err = c.parse_u64("18446744073709551616").unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::Range);
}

#[test]
fn test_decimal_scale_example() {
    assert_eq!(format_decimal(&Decimal::new(12345, 2)), "123.45");
    let parsed = parse_decimal("123.45").unwrap();
    assert_eq!(parsed.mantissa(), 12345);
    assert_eq!(parsed.scale(), 2);
}

#[test]
fn test_guid_example() {
    let id = parse_guid("{3F2504E0-4F89-11D3-9A0C-0305E82C3301}").unwrap();
    assert_eq!(format_guid(&id), "3f2504e0-4f89-11d3-9a0c-0305e82c3301");
}

#[test]
fn test_radix_64_alphabet_edges() {
    let c = NumberCodec::for_radix(64).unwrap();
    assert_eq!(c.format_u64(63), "!");
    assert_eq!(c.format_u64(62), "~");
    assert_eq!(c.format_u64(64), "10");
    assert_eq!(c.parse_u64("Zz"), Ok(61 * 64 + 35));
    assert_eq!(c.parse_u64("zZ"), Ok(35 * 64 + 61));
}

#[test]
fn test_radix_36_is_case_insensitive() {
    let c = NumberCodec::for_radix(36).unwrap();
    assert_eq!(c.parse_u64("ZZ"), c.parse_u64("zz"));
    assert_eq!(c.format_u64(35), "z");
}

#[test]
fn test_unsupported_radix() {
    assert!(NumberCodec::for_radix(1).is_err());
    assert!(NumberCodec::for_radix(65).is_err());
}

#[test]
fn test_one_token_many_types() {
    let c = NumberCodec::decimal();
    let info = c.tokenize(b"-42.50e1 rest").unwrap();
    assert_eq!(info.end, 8);
    assert_eq!(info.to_i64(), Ok(-425));
    assert_eq!(info.to_f64(), Ok(-425.0));
    assert_eq!(info.to_decimal(), Ok(Decimal::new(-425, 0)));
    assert_eq!(info.to_u64(), Err(ParseError::Range { position: 0 }));
}

#[test]
fn test_codec_cache_shared_across_threads() {
    // radix 29 is not pre-seeded and no other test here builds it
    let codecs: Vec<&'static NumberCodec> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| NumberCodec::for_radix(29).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for codec in &codecs {
        assert!(std::ptr::eq(*codec, codecs[0]));
    }
    assert!(std::ptr::eq(codecs[0], NumberCodec::for_radix(29).unwrap()));
    assert_eq!(codecs[0].format_u64(28), "s");
}

#[test]
fn test_float_minimality() {
    let c = NumberCodec::decimal();
    for v in [0.1, 0.25, 1.5, 2.0, 1e10, 123.456, 1e-5] {
        let text = c.format_f64(v);
        let (_, fraction) = text.split_once('.').unwrap_or((&text, ""));
        assert!(!fraction.ends_with('0'), "{text}");
    }
}

// =============================================================================
// Randomized round trips
// =============================================================================

fn binary_float() -> impl Strategy<Value = f64> {
    prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL
}

proptest! {
    #[test]
    fn prop_u64_roundtrip(v in any::<u64>()) {
        let c = NumberCodec::decimal();
        let text = c.format_u64(v);
        prop_assert_eq!(text.len(), c.get_length(v));
        prop_assert_eq!(c.parse_u64(&text), Ok(v));
    }

    #[test]
    fn prop_i64_roundtrip(v in any::<i64>()) {
        let c = NumberCodec::decimal();
        prop_assert_eq!(c.parse_i64(&c.format_i64(v)), Ok(v));
    }

    #[test]
    fn prop_radix_integer_roundtrip(v in any::<u64>(), s in any::<i64>(), idx in 0..RADICES.len()) {
        let c = NumberCodec::for_radix(RADICES[idx]).unwrap();
        prop_assert_eq!(c.parse_u64(&c.format_u64(v)), Ok(v));
        prop_assert_eq!(c.parse_i64(&c.format_i64(s)), Ok(s));
    }

    #[test]
    fn prop_f64_roundtrip(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let c = NumberCodec::decimal();
        let text = c.format_f64(v);
        let back = c.parse_f64(&text).unwrap();
        prop_assert_eq!(back.to_bits(), v.to_bits(), "{}", text);
    }

    #[test]
    fn prop_f32_roundtrip(v in any::<f32>().prop_filter("finite", |v| v.is_finite())) {
        let c = NumberCodec::decimal();
        let text = c.format_f32(v);
        let back = c.parse_f32(&text).unwrap();
        prop_assert_eq!(back.to_bits(), v.to_bits(), "{}", text);
    }

    #[test]
    fn prop_binary_f64_roundtrip(v in binary_float()) {
        let c = NumberCodec::binary();
        let text = c.format_f64(v);
        prop_assert_eq!(c.parse_f64(&text), Ok(v), "{}", text);
    }

    #[test]
    fn prop_decimal_roundtrip(mantissa in -MAX_MANTISSA..=MAX_MANTISSA, scale in 0u32..=28) {
        let value = Decimal::from_i128_with_scale(mantissa, scale);
        let back = parse_decimal(&format_decimal(&value)).unwrap();
        prop_assert_eq!(back.mantissa(), value.mantissa());
        prop_assert_eq!(back.scale(), value.scale());
    }

    #[test]
    fn prop_guid_roundtrip(bits in any::<u128>()) {
        let id = Uuid::from_u128(bits);
        let text = format_guid(&id);
        prop_assert_eq!(&text, &id.hyphenated().to_string());
        prop_assert_eq!(parse_guid(&text), Ok(id));
        prop_assert_eq!(parse_guid(&text.replace('-', "").to_uppercase()), Ok(id));
    }

    #[test]
    fn prop_big_unsigned_roundtrip(limbs in prop::collection::vec(any::<u32>(), 0..12), idx in 0..RADICES.len()) {
        let c = NumberCodec::for_radix(RADICES[idx]).unwrap();
        let value = BigUnsigned::from_limbs(limbs);
        prop_assert_eq!(c.parse_big(&c.format_big(&value)), Ok(value));
    }

    #[test]
    fn prop_big_unsigned_matches_u128(v in any::<u128>()) {
        let value = BigUnsigned::from(v);
        prop_assert_eq!(value.to_string(), v.to_string());
    }
}
