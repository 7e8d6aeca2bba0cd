use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use numtext::{
    format_decimal, format_guid, parse_decimal, parse_guid, BigUnsigned, DateTimeCodec, Decimal,
    NumberCodec, Uuid, MAX_FORMATTED_LEN,
};

// ---------------------------------------------------------------------------
// Input generation
// ---------------------------------------------------------------------------

/// Build a digit string of `n` digits: "123456789123..."
fn make_digits(n: usize) -> String {
    (0..n)
        .map(|i| char::from(b'1' + u8::try_from(i % 9).unwrap()))
        .collect()
}

// ---------------------------------------------------------------------------
// Integer benchmarks
// ---------------------------------------------------------------------------

fn bench_integers(c: &mut Criterion) {
    let mut g = c.benchmark_group("integer");
    let mut buf = [0u8; MAX_FORMATTED_LEN];

    for radix in [2, 10, 16, 64] {
        let codec = NumberCodec::for_radix(radix).unwrap();
        let text = codec.format_u64(u64::MAX / 3);

        g.bench_with_input(BenchmarkId::new("write_u64", radix), codec, |b, codec| {
            b.iter(|| codec.write_u64(black_box(u64::MAX / 3), &mut buf));
        });
        g.bench_with_input(BenchmarkId::new("parse_u64", radix), &text, |b, text| {
            b.iter(|| codec.parse_u64(black_box(text)).unwrap());
        });
    }

    let codec = NumberCodec::decimal();
    g.bench_function("write_i64/small", |b| {
        b.iter(|| codec.write_i64(black_box(-42), &mut buf));
    });
    g.bench_function("parse_i64_exp", |b| {
        b.iter(|| codec.parse_i64_exp_prefix(black_box(b"-1.2345e3")).unwrap());
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Float benchmarks
// ---------------------------------------------------------------------------

fn bench_floats(c: &mut Criterion) {
    let mut g = c.benchmark_group("float");
    let mut buf = [0u8; MAX_FORMATTED_LEN];

    let inputs = [
        ("short", 0.5f64),
        ("medium", 123.456_789),
        ("full", std::f64::consts::PI),
        ("scientific", 6.022_140_76e23),
    ];
    for radix in [10, 16] {
        let codec = NumberCodec::for_radix(radix).unwrap();
        for (name, value) in inputs {
            g.bench_with_input(
                BenchmarkId::new(format!("write_f64/{radix}"), name),
                &value,
                |b, &v| {
                    b.iter(|| codec.write_f64(black_box(v), &mut buf));
                },
            );
        }
    }

    let codec = NumberCodec::decimal();
    for (name, text) in [
        ("fast_path", "123.456"),
        ("long", "3.141592653589793"),
        ("exponent", "6.02214076E+23"),
    ] {
        g.bench_with_input(BenchmarkId::new("parse_f64", name), text, |b, text| {
            b.iter(|| codec.parse_f64(black_box(text)).unwrap());
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Decimal, GUID and big-integer benchmarks
// ---------------------------------------------------------------------------

fn bench_fixed_layouts(c: &mut Criterion) {
    let mut g = c.benchmark_group("layout");

    let small = Decimal::new(42, 0);
    let full = Decimal::MAX;
    g.bench_function("format_decimal/small", |b| {
        b.iter(|| format_decimal(black_box(&small)));
    });
    g.bench_function("format_decimal/max", |b| {
        b.iter(|| format_decimal(black_box(&full)));
    });
    g.bench_function("parse_decimal/scaled", |b| {
        b.iter(|| parse_decimal(black_box("-12345.6789")).unwrap());
    });

    let id = Uuid::from_u128(0x3f25_04e0_4f89_11d3_9a0c_0305_e82c_3301);
    g.bench_function("format_guid", |b| {
        b.iter(|| format_guid(black_box(&id)));
    });
    g.bench_function("parse_guid/braced", |b| {
        b.iter(|| parse_guid(black_box("{3F2504E0-4F89-11D3-9A0C-0305E82C3301}")).unwrap());
    });

    let codec = NumberCodec::decimal();
    for n in [100, 1000] {
        let text = make_digits(n);
        let value: BigUnsigned = text.parse().unwrap();
        g.bench_with_input(BenchmarkId::new("parse_big", n), &text, |b, text| {
            b.iter(|| codec.parse_big(black_box(text)).unwrap());
        });
        g.bench_with_input(BenchmarkId::new("format_big", n), &value, |b, value| {
            b.iter(|| codec.format_big(black_box(value)));
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Timestamp benchmarks
// ---------------------------------------------------------------------------

fn bench_datetime(c: &mut Criterion) {
    let mut g = c.benchmark_group("datetime");
    let codec = DateTimeCodec::new();
    let value = codec.parse("2024-03-05T07:08:09.123+02:00").unwrap();

    g.bench_function("format", |b| {
        b.iter(|| codec.format(black_box(&value)));
    });
    for (name, text) in [
        ("extended", "2024-03-05T07:08:09.123+02:00"),
        ("basic", "20240305T070809.123Z"),
        ("week", "2024-W10-2T07:08Z"),
        ("ordinal", "2024-065T07:08Z"),
    ] {
        g.bench_with_input(BenchmarkId::new("parse", name), text, |b, text| {
            b.iter(|| codec.parse(black_box(text)).unwrap());
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Criterion harness
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_integers,
    bench_floats,
    bench_fixed_layouts,
    bench_datetime
);
criterion_main!(benches);
