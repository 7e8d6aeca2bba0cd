//! Floating-point formatting and parsing.
//!
//! Base 10 renders the shortest digit string that reads back to the same
//! value. Other radices use the codec's exponent tables: a binary search
//! picks the magnitude, then the value is written either in fixed point or
//! in scientific form with half-up rounding of the last digit.

use std::fmt::{self, Write as _};

use crate::codec::{ascii_string, NumberCodec};
use crate::error::{ParseError, ParseResult};
use crate::info::NumberInfo;
use crate::integer::whole;

/// Text written for positive infinity (the sign is written separately)
pub const INFINITY_SYMBOL: &str = "∞";
/// Text written for NaN
pub const NAN_SYMBOL: &str = "NaN";

/// Buffer size that fits any formatted float in any radix
pub const MAX_FLOAT_LEN: usize = 128;

/// Values at or above this many leading fractional zeros switch to
/// scientific form
const SCIENTIFIC_LEADING_ZEROS: usize = 5;

/// Bounds of the exact base-10 fast path
const EXACT_MANTISSA: u64 = 1 << 53;
const EXACT_MANTISSA_F32: u64 = 1 << 24;
const EXACT_POW10: usize = 22;
const EXACT_POW10_F32: usize = 10;

const MAX_EXPONENT: i64 = 1024;

/// Fixed-capacity stack buffer that implements `fmt::Write`.
///
/// 32 bytes holds any `{:e}` rendering of an `f64` (sign, 17 significant
/// digits, decimal point, `e`, signed three-digit exponent).
struct StackBuf {
    buf: [u8; 32],
    len: usize,
}

impl StackBuf {
    const fn new() -> Self {
        Self {
            buf: [0; 32],
            len: 0,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl fmt::Write for StackBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let new_len = self.len + bytes.len();
        if new_len > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.len..new_len].copy_from_slice(bytes);
        self.len = new_len;
        Ok(())
    }
}

/// Shortest round-trip digits of a positive finite value, as ASCII digits
/// and the exponent of the first digit (`value = d.ddd × 10^exp`)
struct ShortestDigits {
    digits: [u8; 17],
    len: usize,
    exp: i64,
}

impl ShortestDigits {
    #[allow(clippy::cast_possible_truncation)]
    fn new(value: f64, single: bool) -> Self {
        let mut buf = StackBuf::new();
        // `{:e}` on the standard floats prints the shortest round-trip digits
        if single {
            write!(buf, "{:e}", value as f32).expect("f32 scientific form fits in 32 bytes");
        } else {
            write!(buf, "{value:e}").expect("f64 scientific form fits in 32 bytes");
        }

        let bytes = buf.as_bytes();
        let mut digits = [0u8; 17];
        let mut len = 0;
        let mut exp = 0i64;
        let mut exp_negative = false;
        let mut in_exponent = false;
        for &b in bytes {
            match b {
                b'e' => in_exponent = true,
                b'-' if in_exponent => exp_negative = true,
                b'0'..=b'9' if in_exponent => exp = exp * 10 + i64::from(b - b'0'),
                b'0'..=b'9' if len < digits.len() => {
                    digits[len] = b;
                    len += 1;
                }
                _ => {}
            }
        }
        Self {
            digits,
            len,
            exp: if exp_negative { -exp } else { exp },
        }
    }

    fn as_slice(&self) -> &[u8] {
        &self.digits[..self.len]
    }
}

impl NumberCodec {
    /// Write `value` into `out`, returning the number of bytes written.
    ///
    /// The text reads back to the identical value only in radices 2 and 10.
    /// Other radices write `floor(53 / log2 radix)` digits, which can fall
    /// one digit short of an exact round trip.
    ///
    /// `out` must hold at least [`MAX_FLOAT_LEN`] bytes.
    pub fn write_f64(&self, value: f64, out: &mut [u8]) -> usize {
        self.write_float(value, false, out)
    }

    /// Write `value` with the `f32` digit count.
    ///
    /// `out` must hold at least [`MAX_FLOAT_LEN`] bytes.
    pub fn write_f32(&self, value: f32, out: &mut [u8]) -> usize {
        self.write_float(f64::from(value), true, out)
    }

    #[must_use]
    pub fn format_f64(&self, value: f64) -> String {
        let mut buf = [0u8; MAX_FLOAT_LEN];
        let len = self.write_f64(value, &mut buf);
        ascii_string(&buf[..len])
    }

    #[must_use]
    pub fn format_f32(&self, value: f32) -> String {
        let mut buf = [0u8; MAX_FLOAT_LEN];
        let len = self.write_f32(value, &mut buf);
        ascii_string(&buf[..len])
    }

    fn write_float(&self, value: f64, single: bool, out: &mut [u8]) -> usize {
        if value.is_nan() {
            return write_bytes(NAN_SYMBOL.as_bytes(), out);
        }

        let mut pos = 0;
        if value.is_sign_negative() {
            out[0] = b'-';
            pos = 1;
        }
        let magnitude = value.abs();
        if magnitude == 0.0 {
            out[pos] = b'0';
            return pos + 1;
        }
        if magnitude.is_infinite() {
            return pos + write_bytes(INFINITY_SYMBOL.as_bytes(), &mut out[pos..]);
        }

        let max_digits = if single { self.f32_digits } else { self.f64_digits };
        pos + if self.radix == 10 {
            let shortest = ShortestDigits::new(magnitude, single);
            self.write_laid_out(shortest.as_slice(), shortest.exp, max_digits, &mut out[pos..])
        } else {
            self.write_from_tables(magnitude, max_digits, &mut out[pos..])
        }
    }

    /// Lay out significant ASCII `digits` whose first digit has exponent
    /// `exp`, choosing fixed point or scientific form
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn write_laid_out(&self, digits: &[u8], exp: i64, max_digits: usize, out: &mut [u8]) -> usize {
        let n = digits.len();
        if exp >= max_digits as i64 {
            return self.write_scientific_digits(digits, exp, out);
        }
        if exp < 0 {
            let zeros = (-exp - 1) as usize;
            if zeros >= SCIENTIFIC_LEADING_ZEROS {
                return self.write_scientific_digits(digits, exp, out);
            }
            out[..2].copy_from_slice(b"0.");
            out[2..2 + zeros].fill(b'0');
            out[2 + zeros..2 + zeros + n].copy_from_slice(digits);
            return 2 + zeros + n;
        }

        let int_len = exp as usize + 1;
        if n <= int_len {
            out[..n].copy_from_slice(digits);
            out[n..int_len].fill(b'0');
            int_len
        } else {
            out[..int_len].copy_from_slice(&digits[..int_len]);
            out[int_len] = b'.';
            out[int_len + 1..=n].copy_from_slice(&digits[int_len..]);
            n + 1
        }
    }

    fn write_scientific_digits(&self, digits: &[u8], exp: i64, out: &mut [u8]) -> usize {
        out[0] = digits[0];
        let mut pos = 1;
        if digits.len() > 1 {
            out[1] = b'.';
            out[2..=digits.len()].copy_from_slice(&digits[1..]);
            pos = digits.len() + 1;
        }
        pos + self.write_exponent(exp, &mut out[pos..])
    }

    fn write_exponent(&self, exp: i64, out: &mut [u8]) -> usize {
        out[0] = b'E';
        out[1] = if exp < 0 { b'-' } else { b'+' };
        2 + self.write_u64(exp.unsigned_abs(), &mut out[2..])
    }

    /// Table-driven rendering for radices other than 10
    #[allow(clippy::cast_possible_wrap)]
    fn write_from_tables(&self, v: f64, max_digits: usize, out: &mut [u8]) -> usize {
        let p = self.positive_exponents.partition_point(|&e| e <= v);
        if p >= max_digits {
            let m = v / self.positive_exponents[p - 1];
            return self.write_scientific(m, p as i64, max_digits, out);
        }

        if v < 1.0 {
            let n = (1 + self.negative_exponents.partition_point(|&e| e > v))
                .min(self.negative_exponents.len());
            if n > SCIENTIFIC_LEADING_ZEROS {
                let m = v / self.negative_exponents[n - 1];
                return self.write_scientific(m, -(n as i64), max_digits, out);
            }
            let frac_digits = (max_digits + n - 1).min(self.powers_u64.len() - 2);
            return self.write_fixed_point(v, frac_digits, out);
        }

        self.write_fixed_point(v, max_digits - (p + 1), out)
    }

    /// Scientific form `m × radix^exp` with one integer digit
    fn write_scientific(&self, mut m: f64, mut exp: i64, max_digits: usize, out: &mut [u8]) -> usize {
        let base = f64::from(self.radix);
        while m >= base {
            m /= base;
            exp += 1;
        }
        while m < 1.0 {
            m *= base;
            exp -= 1;
        }

        let (mut int_part, mut scaled, mut k) = self.round_fraction(m, max_digits - 1);
        if int_part >= u64::from(self.radix) {
            int_part = 1;
            scaled = 0;
            k = 0;
            exp += 1;
        }
        let mut pos = self.write_u64(int_part, out);
        pos += self.write_fraction(scaled, k, &mut out[pos..]);
        pos + self.write_exponent(exp, &mut out[pos..])
    }

    fn write_fixed_point(&self, v: f64, frac_digits: usize, out: &mut [u8]) -> usize {
        let (int_part, scaled, k) = self.round_fraction(v, frac_digits);
        let pos = self.write_u64(int_part, out);
        pos + self.write_fraction(scaled, k, &mut out[pos..])
    }

    fn write_fraction(&self, scaled: u64, k: usize, out: &mut [u8]) -> usize {
        if k == 0 {
            return 0;
        }
        out[0] = b'.';
        self.write_fixed(scaled, k, &mut out[1..]);
        k + 1
    }

    /// Split `v` into its integer part and `frac_digits` fractional digits,
    /// rounding the last digit half-up and trimming trailing zeros.
    ///
    /// Returns `(integer, fraction digits as an integer, fraction length)`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn round_fraction(&self, v: f64, frac_digits: usize) -> (u64, u64, usize) {
        let r = u64::from(self.radix);
        let truncated = v.trunc();
        let mut int_part = truncated as u64;
        let frac = v - truncated;

        let scaled_plus = (frac * self.powers_u64[frac_digits + 1] as f64) as u64;
        let mut scaled = scaled_plus / r;
        if scaled_plus % r >= self.rounded {
            scaled += 1;
            if scaled == self.powers_u64[frac_digits] {
                int_part += 1;
                scaled = 0;
            }
        }
        if scaled == 0 {
            return (int_part, 0, 0);
        }

        let mut k = frac_digits;
        for chunk in [8, 4, 2, 1] {
            while k >= chunk && scaled % self.powers_u64[chunk] == 0 {
                scaled /= self.powers_u64[chunk];
                k -= chunk;
            }
        }
        (int_part, scaled, k)
    }

    /// Recognize `NaN` and an optionally signed `∞`
    fn special_float(text: &[u8]) -> Option<(f64, usize)> {
        if text.starts_with(NAN_SYMBOL.as_bytes()) {
            return Some((f64::NAN, NAN_SYMBOL.len()));
        }
        let (negative, start) = match text.first() {
            Some(b'-') => (true, 1),
            Some(b'+') => (false, 1),
            _ => (false, 0),
        };
        text[start..]
            .starts_with(INFINITY_SYMBOL.as_bytes())
            .then(|| {
                let v = if negative { f64::NEG_INFINITY } else { f64::INFINITY };
                (v, start + INFINITY_SYMBOL.len())
            })
    }

    /// Parse an `f64` at the start of `text`.
    ///
    /// # Errors
    ///
    /// [`ParseError::Empty`], [`ParseError::Format`] when no digits are
    /// present, [`ParseError::Range`] for exponents of magnitude 1024 or
    /// more (below the codec's smallest subnormal for negative exponents)
    /// and for values that overflow.
    pub fn parse_f64_prefix(&self, text: &[u8]) -> ParseResult<(f64, usize)> {
        if let Some(special) = Self::special_float(text) {
            return Ok(special);
        }
        let info = self.tokenize(text)?;
        Ok((self.assemble_f64(&info)?, info.end))
    }

    /// Parse an `f32` at the start of `text`.
    ///
    /// # Errors
    ///
    /// As for [`parse_f64_prefix`](Self::parse_f64_prefix).
    #[allow(clippy::cast_possible_truncation)]
    pub fn parse_f32_prefix(&self, text: &[u8]) -> ParseResult<(f32, usize)> {
        if let Some((v, len)) = Self::special_float(text) {
            return Ok((v as f32, len));
        }
        let info = self.tokenize(text)?;
        Ok((self.assemble_f32(&info)?, info.end))
    }

    /// Parse all of `text` as an `f64`.
    ///
    /// # Errors
    ///
    /// As for [`parse_f64_prefix`](Self::parse_f64_prefix), plus
    /// [`ParseError::Format`] for trailing bytes.
    pub fn parse_f64(&self, text: &str) -> ParseResult<f64> {
        whole(text.as_bytes(), self.parse_f64_prefix(text.as_bytes()))
    }

    /// Parse all of `text` as an `f32`.
    ///
    /// # Errors
    ///
    /// See [`parse_f64`](Self::parse_f64).
    pub fn parse_f32(&self, text: &str) -> ParseResult<f32> {
        whole(text.as_bytes(), self.parse_f32_prefix(text.as_bytes()))
    }

    /// Reject exponents of magnitude 1024 or more, except the negative
    /// exponents this codec writes for the smallest subnormals
    fn check_exponent(&self, info: &NumberInfo<'_>) -> ParseResult<i64> {
        let exp = info.exponent_value();
        let limit = if exp < 0 {
            i64::try_from(self.negative_exponents.len())
                .map_or(MAX_EXPONENT, |len| MAX_EXPONENT.max(len + 1))
        } else {
            MAX_EXPONENT
        };
        if exp.abs() >= limit {
            return Err(ParseError::Range {
                position: info.exponent.begin,
            });
        }
        Ok(exp)
    }

    pub(crate) fn assemble_f64(&self, info: &NumberInfo<'_>) -> ParseResult<f64> {
        let negative = info.is_negative;
        if info.is_zero() {
            return Ok(if negative { -0.0 } else { 0.0 });
        }
        let exp = self.check_exponent(info)?;

        let magnitude = if self.radix == 10 {
            if let Some(v) = self.exact_f64(info, exp) {
                v
            } else {
                let v: f64 = literal_str(info)?
                    .parse()
                    .map_err(|_| ParseError::Format { position: 0 })?;
                v.abs()
            }
        } else {
            self.accumulate_f64(info, exp)
        };

        if magnitude.is_infinite() {
            return Err(ParseError::Range { position: 0 });
        }
        Ok(if negative { -magnitude } else { magnitude })
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn assemble_f32(&self, info: &NumberInfo<'_>) -> ParseResult<f32> {
        let negative = info.is_negative;
        if info.is_zero() {
            return Ok(if negative { -0.0 } else { 0.0 });
        }
        let exp = self.check_exponent(info)?;

        let magnitude = if self.radix == 10 {
            if let Some(v) = self.exact_f32(info, exp) {
                v
            } else {
                let v: f32 = literal_str(info)?
                    .parse()
                    .map_err(|_| ParseError::Format { position: 0 })?;
                v.abs()
            }
        } else {
            self.accumulate_f64(info, exp) as f32
        };

        if magnitude.is_infinite() {
            return Err(ParseError::Range { position: 0 });
        }
        Ok(if negative { -magnitude } else { magnitude })
    }

    /// Mantissa and power of ten for literals short enough that both are
    /// exactly representable, so a single multiply or divide rounds correctly.
    ///
    /// Returns `(mantissa, |scale|, scale is negative)`.
    fn small_decimal(info: &NumberInfo<'_>, exp: i64, mantissa_limit: u64, pow_limit: usize) -> Option<(u64, usize, bool)> {
        if info.integer.count + info.fraction.count > 19 {
            return None;
        }
        let mantissa = info
            .digits()
            .fold(0u64, |acc, d| acc * 10 + u64::from(d));
        if mantissa >= mantissa_limit {
            return None;
        }
        let scale = exp - i64::try_from(info.fraction.count).ok()?;
        let power = usize::try_from(scale.unsigned_abs()).ok()?;
        (power <= pow_limit).then_some((mantissa, power, scale < 0))
    }

    #[allow(clippy::cast_precision_loss)]
    fn exact_f64(&self, info: &NumberInfo<'_>, exp: i64) -> Option<f64> {
        let (mantissa, power, negative) = Self::small_decimal(info, exp, EXACT_MANTISSA, EXACT_POW10)?;
        let m = mantissa as f64;
        Some(match power {
            0 => m,
            _ if negative => m / self.positive_exponents[power - 1],
            _ => m * self.positive_exponents[power - 1],
        })
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn exact_f32(&self, info: &NumberInfo<'_>, exp: i64) -> Option<f32> {
        let (mantissa, power, negative) = Self::small_decimal(info, exp, EXACT_MANTISSA_F32, EXACT_POW10_F32)?;
        let m = mantissa as f32;
        // powers of ten up to 10^10 are exact in f32
        Some(match power {
            0 => m,
            _ if negative => m / self.positive_exponents[power - 1] as f32,
            _ => m * self.positive_exponents[power - 1] as f32,
        })
    }

    /// Accumulate the mantissa in `u64` chunks, then scale by the radix
    /// power in steps of 100, 10 and 1.
    ///
    /// Digits past twice the `f64` digit count are dropped and only raise
    /// the scale, which keeps the accumulator finite for any length.
    #[allow(clippy::cast_precision_loss)]
    fn accumulate_f64(&self, info: &NumberInfo<'_>, exp: i64) -> f64 {
        let r = u64::from(self.radix);
        let chunk_len = self.powers_u64.len() - 2;
        let max_significant = 2 * self.f64_digits;
        let mut acc = 0.0f64;
        let mut chunk = 0u64;
        let mut in_chunk = 0;
        let mut significant = 0;
        let mut dropped = 0i64;
        for d in info.digits() {
            if significant == max_significant {
                dropped += 1;
                continue;
            }
            if significant > 0 || d != 0 {
                significant += 1;
            }
            chunk = chunk * r + u64::from(d);
            in_chunk += 1;
            if in_chunk == chunk_len {
                acc = acc * self.powers_u64[chunk_len] as f64 + chunk as f64;
                chunk = 0;
                in_chunk = 0;
            }
        }
        if in_chunk > 0 {
            acc = acc * self.powers_u64[in_chunk] as f64 + chunk as f64;
        }

        let fraction = i64::try_from(info.fraction.count).unwrap_or(i64::MAX);
        let scale = exp.saturating_sub(fraction).saturating_add(dropped);
        let mut remaining = scale.unsigned_abs();
        for (step, power) in [
            (100, self.positive_exponents[99]),
            (10, self.positive_exponents[9]),
            (1, self.positive_exponents[0]),
        ] {
            while remaining >= step && acc != 0.0 && acc.is_finite() {
                if scale > 0 {
                    acc *= power;
                } else {
                    acc /= power;
                }
                remaining -= step;
            }
        }
        acc
    }
}

fn write_bytes(bytes: &[u8], out: &mut [u8]) -> usize {
    out[..bytes.len()].copy_from_slice(bytes);
    bytes.len()
}

/// The scanned literal as text for the standard library's parser
fn literal_str<'a>(info: &NumberInfo<'a>) -> ParseResult<&'a str> {
    std::str::from_utf8(info.literal()).map_err(|e| ParseError::Format {
        position: e.valid_up_to(),
    })
}
