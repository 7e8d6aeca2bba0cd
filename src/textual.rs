//! Generic `format`/`parse` entry points over every supported value type.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::codec::{ascii_string, NumberCodec};
use crate::decimal::{parse_decimal_prefix, write_decimal};
use crate::error::{strict, ParseResult};
use crate::guid::{parse_guid_prefix, write_guid};
use crate::integer::whole;
use crate::limb::BigUnsigned;

/// Buffer size that fits the text of any fixed-size value in any radix
pub const MAX_FORMATTED_LEN: usize = 128;

/// Values that can be written as text by a [`NumberCodec`]
pub trait FormatRadix {
    /// Write `self` into `out`, returning the number of bytes written.
    ///
    /// `out` must hold at least [`MAX_FORMATTED_LEN`] bytes, or
    /// [`max_len`](Self::max_len) when that is larger.
    fn write_radix(&self, codec: &NumberCodec, out: &mut [u8]) -> usize;

    /// Upper bound on the written length
    fn max_len(&self) -> usize {
        MAX_FORMATTED_LEN
    }
}

/// Values that can be read from text by a [`NumberCodec`]
pub trait ParseRadix: Sized {
    /// Parse a value at the start of `text`, returning it with the number
    /// of bytes consumed.
    ///
    /// # Errors
    ///
    /// Any [`ParseError`](crate::ParseError) the type's parser reports.
    fn parse_radix_prefix(codec: &NumberCodec, text: &[u8]) -> ParseResult<(Self, usize)>;
}

impl FormatRadix for u64 {
    fn write_radix(&self, codec: &NumberCodec, out: &mut [u8]) -> usize {
        codec.write_u64(*self, out)
    }
}

impl FormatRadix for i64 {
    fn write_radix(&self, codec: &NumberCodec, out: &mut [u8]) -> usize {
        codec.write_i64(*self, out)
    }
}

impl FormatRadix for f64 {
    fn write_radix(&self, codec: &NumberCodec, out: &mut [u8]) -> usize {
        codec.write_f64(*self, out)
    }
}

impl FormatRadix for f32 {
    fn write_radix(&self, codec: &NumberCodec, out: &mut [u8]) -> usize {
        codec.write_f32(*self, out)
    }
}

/// Always base 10, whatever the codec
impl FormatRadix for Decimal {
    fn write_radix(&self, _codec: &NumberCodec, out: &mut [u8]) -> usize {
        write_decimal(self, out)
    }
}

/// Always base 16, whatever the codec
impl FormatRadix for Uuid {
    fn write_radix(&self, _codec: &NumberCodec, out: &mut [u8]) -> usize {
        write_guid(self, out)
    }
}

impl FormatRadix for BigUnsigned {
    fn write_radix(&self, codec: &NumberCodec, out: &mut [u8]) -> usize {
        let mut limbs = self.as_limbs().to_vec();
        let len = limbs.len();
        codec.write_limbs_in_place(&mut limbs, len, out)
    }

    fn max_len(&self) -> usize {
        self.as_limbs().len() * 32 + 1
    }
}

impl ParseRadix for u64 {
    fn parse_radix_prefix(codec: &NumberCodec, text: &[u8]) -> ParseResult<(Self, usize)> {
        codec.parse_u64_prefix(text)
    }
}

impl ParseRadix for i64 {
    fn parse_radix_prefix(codec: &NumberCodec, text: &[u8]) -> ParseResult<(Self, usize)> {
        codec.parse_i64_prefix(text)
    }
}

impl ParseRadix for f64 {
    fn parse_radix_prefix(codec: &NumberCodec, text: &[u8]) -> ParseResult<(Self, usize)> {
        codec.parse_f64_prefix(text)
    }
}

impl ParseRadix for f32 {
    fn parse_radix_prefix(codec: &NumberCodec, text: &[u8]) -> ParseResult<(Self, usize)> {
        codec.parse_f32_prefix(text)
    }
}

impl ParseRadix for Decimal {
    fn parse_radix_prefix(_codec: &NumberCodec, text: &[u8]) -> ParseResult<(Self, usize)> {
        parse_decimal_prefix(text)
    }
}

impl ParseRadix for Uuid {
    fn parse_radix_prefix(_codec: &NumberCodec, text: &[u8]) -> ParseResult<(Self, usize)> {
        parse_guid_prefix(text)
    }
}

impl ParseRadix for BigUnsigned {
    fn parse_radix_prefix(codec: &NumberCodec, text: &[u8]) -> ParseResult<(Self, usize)> {
        codec.parse_big_prefix(text)
    }
}

impl NumberCodec {
    /// Write `value` into `out`, returning the number of bytes written
    pub fn format_into<T: FormatRadix + ?Sized>(&self, value: &T, out: &mut [u8]) -> usize {
        value.write_radix(self, out)
    }

    /// Format `value` in this codec's radix
    #[must_use]
    pub fn format<T: FormatRadix + ?Sized>(&self, value: &T) -> String {
        let max_len = value.max_len();
        if max_len <= MAX_FORMATTED_LEN {
            let mut buf = [0u8; MAX_FORMATTED_LEN];
            let len = value.write_radix(self, &mut buf);
            ascii_string(&buf[..len])
        } else {
            let mut buf = vec![0u8; max_len];
            let len = value.write_radix(self, &mut buf);
            buf.truncate(len);
            ascii_string(&buf)
        }
    }

    /// Parse a value at the start of `text`.
    ///
    /// # Errors
    ///
    /// Any error reported by `T`'s parser.
    pub fn parse_prefix<T: ParseRadix>(&self, text: &[u8]) -> ParseResult<(T, usize)> {
        T::parse_radix_prefix(self, text)
    }

    /// Parse all of `text`.
    ///
    /// # Errors
    ///
    /// Any error reported by `T`'s parser, and
    /// [`ParseError::Format`](crate::ParseError::Format) if bytes remain.
    pub fn parse<T: ParseRadix>(&self, text: &str) -> ParseResult<T> {
        whole(text.as_bytes(), T::parse_radix_prefix(self, text.as_bytes()))
    }

    /// Parse all of `text`, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics with the parse error's message if `text` is not a valid `T`.
    #[must_use]
    #[track_caller]
    pub fn parse_strict<T: ParseRadix>(&self, text: &str) -> T {
        strict(self.parse(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn test_generic_format() {
        let c = NumberCodec::decimal();
        assert_eq!(c.format(&42u64), "42");
        assert_eq!(c.format(&-42i64), "-42");
        assert_eq!(c.format(&2.5f64), "2.5");
        assert_eq!(c.format(&0.1f32), "0.1");
        assert_eq!(c.format(&Decimal::new(12345, 2)), "123.45");
        assert_eq!(c.format(&Uuid::nil()), "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_radix_specific_types() {
        let hex = NumberCodec::hexadecimal();
        assert_eq!(hex.format(&255u64), "ff");
        assert_eq!(hex.parse::<i64>("-ff"), Ok(-255));
        // decimals stay in base 10 whatever the codec
        assert_eq!(hex.format(&Decimal::new(15, 0)), "15");
        assert_eq!(hex.parse::<Decimal>("15"), Ok(Decimal::new(15, 0)));
    }

    #[test]
    fn test_big_value_exceeds_fixed_buffer() {
        let c = NumberCodec::binary();
        let value = BigUnsigned::from_limbs(vec![u32::MAX; 8]);
        let text = c.format(&value);
        assert_eq!(text.len(), 256);
        assert!(text.bytes().all(|b| b == b'1'));
        assert_eq!(c.parse::<BigUnsigned>(&text), Ok(value));
    }

    #[test]
    fn test_prefix_and_whole() {
        let c = NumberCodec::decimal();
        assert_eq!(c.parse_prefix::<u64>(b"123abc"), Ok((123, 3)));
        assert_eq!(c.parse::<u64>("123abc"), Err(ParseError::Format { position: 3 }));
    }

    #[test]
    fn test_strict() {
        let c = NumberCodec::decimal();
        let v: f64 = c.parse_strict("1.25");
        assert_eq!(v, 1.25);
    }

    #[test]
    #[should_panic(expected = "strict parse failed")]
    fn test_strict_panics() {
        let _: u64 = NumberCodec::decimal().parse_strict("-1");
    }
}
