//! Big-integer and [`Decimal`] text conversion.
//!
//! Both go through the same chunked path: the limb buffer is divided by
//! `radix^base_length` until a single limb remains, and the remainders are
//! written most-significant first as fixed-width groups.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::codec::{ascii_string, NumberCodec};
use crate::error::{ParseError, ParseResult};
use crate::info::NumberInfo;
use crate::integer::{read_sign, whole};
use crate::limb::{add_scalar, div_scalar, mul_scalar, normalized_len, BigUnsigned};

/// Largest scale a [`Decimal`] can carry
pub const MAX_DECIMAL_SCALE: u32 = 28;

/// Upper bound on the digits of a 96-bit mantissa
const MAX_DECIMAL_DIGITS: usize = 29;

/// Limbs used while accumulating a decimal mantissa; one more than fits
const ACCUMULATOR_LIMBS: usize = 4;

/// Buffer size that fits any formatted [`Decimal`]
pub const MAX_DECIMAL_LEN: usize = 64;

impl NumberCodec {
    /// Write the value of `limbs[..len]` and consume the buffer.
    ///
    /// The limbs are divided in place and hold no meaningful value
    /// afterwards. `out` must hold `len * 32` bytes plus one.
    pub fn write_limbs_in_place(&self, limbs: &mut [u32], len: usize, out: &mut [u8]) -> usize {
        let mut len = normalized_len(limbs, len);
        let mut chunks = Vec::with_capacity(len * 32 / self.base_length + 1);
        while len > 1 {
            let (next, rem) = div_scalar(limbs, len, self.base_divisor);
            chunks.push(rem);
            len = next;
        }
        let top = if len == 1 { limbs[0] } else { 0 };

        let mut pos = self.write_u64(u64::from(top), out);
        for &chunk in chunks.iter().rev() {
            self.write_fixed(u64::from(chunk), self.base_length, &mut out[pos..]);
            pos += self.base_length;
        }
        pos
    }

    /// Format `limbs[..len]`, consuming the buffer
    #[must_use]
    pub fn format_limbs_in_place(&self, limbs: &mut [u32], len: usize) -> String {
        let mut out = vec![0u8; len * 32 + 1];
        let written = self.write_limbs_in_place(limbs, len, &mut out);
        ascii_string(&out[..written])
    }

    /// Format a little-endian limb slice, leaving it untouched
    #[must_use]
    pub fn format_limbs(&self, limbs: &[u32]) -> String {
        let mut copy = limbs.to_vec();
        self.format_limbs_in_place(&mut copy, limbs.len())
    }

    #[must_use]
    pub fn format_big(&self, value: &BigUnsigned) -> String {
        self.format_limbs(value.as_limbs())
    }

    /// Parse an unsigned big integer at the start of `text`.
    ///
    /// A leading `+` is accepted, and `-` only for zero.
    ///
    /// # Errors
    ///
    /// [`ParseError::Empty`], [`ParseError::Format`] if no digit follows the
    /// sign, [`ParseError::Range`] for a negative non-zero value.
    pub fn parse_big_prefix(&self, text: &[u8]) -> ParseResult<(BigUnsigned, usize)> {
        let (negative, start) = read_sign(text)?;
        let mut value = BigUnsigned::zero();
        let mut chunk = 0u32;
        let mut in_chunk = 0;
        let mut pos = start;
        while let Some(d) = text.get(pos).and_then(|&c| self.digit_value(c)) {
            chunk = chunk * self.radix + u32::from(d);
            in_chunk += 1;
            pos += 1;
            if in_chunk == self.base_length {
                value.mul_add(self.base_divisor, chunk);
                chunk = 0;
                in_chunk = 0;
            }
        }
        if pos == start {
            return Err(ParseError::Format { position: pos });
        }
        if in_chunk > 0 {
            value.mul_add(self.powers_u32[in_chunk], chunk);
        }
        if negative && !value.is_zero() {
            return Err(ParseError::Range { position: 0 });
        }
        Ok((value, pos))
    }

    /// Parse all of `text` as an unsigned big integer.
    ///
    /// # Errors
    ///
    /// See [`parse_big_prefix`](Self::parse_big_prefix).
    pub fn parse_big(&self, text: &str) -> ParseResult<BigUnsigned> {
        whole(text.as_bytes(), self.parse_big_prefix(text.as_bytes()))
    }
}

impl fmt::Display for BigUnsigned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&NumberCodec::decimal().format_big(self))
    }
}

impl FromStr for BigUnsigned {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumberCodec::decimal().parse_big(s)
    }
}

/// Write `value` in base 10 with its scale preserved.
///
/// `out` must hold at least [`MAX_DECIMAL_LEN`] bytes.
#[allow(clippy::cast_possible_truncation)]
pub fn write_decimal(value: &Decimal, out: &mut [u8]) -> usize {
    let codec = NumberCodec::decimal();
    let mantissa = value.mantissa();
    let magnitude = mantissa.unsigned_abs();

    let mut pos = 0;
    if mantissa < 0 {
        out[0] = b'-';
        pos = 1;
    }

    let mut limbs = [
        magnitude as u32,
        (magnitude >> 32) as u32,
        (magnitude >> 64) as u32,
    ];
    let mut digits = [0u8; 3 * 32 + 1];
    let n = codec.write_limbs_in_place(&mut limbs, 3, &mut digits);
    let scale = value.scale() as usize;

    if scale == 0 {
        out[pos..pos + n].copy_from_slice(&digits[..n]);
        pos + n
    } else if n > scale {
        let int_len = n - scale;
        out[pos..pos + int_len].copy_from_slice(&digits[..int_len]);
        out[pos + int_len] = b'.';
        out[pos + int_len + 1..=pos + n].copy_from_slice(&digits[int_len..n]);
        pos + n + 1
    } else {
        let zeros = scale - n;
        out[pos..pos + 2].copy_from_slice(b"0.");
        pos += 2;
        out[pos..pos + zeros].fill(b'0');
        pos += zeros;
        out[pos..pos + n].copy_from_slice(&digits[..n]);
        pos + n
    }
}

#[must_use]
pub fn format_decimal(value: &Decimal) -> String {
    let mut buf = [0u8; MAX_DECIMAL_LEN];
    let len = write_decimal(value, &mut buf);
    ascii_string(&buf[..len])
}

/// Parse a base-10 [`Decimal`] at the start of `text`.
///
/// # Errors
///
/// [`ParseError::Empty`], [`ParseError::Format`] when no digits are present,
/// [`ParseError::Range`] when the mantissa needs more than 96 bits or the
/// scale cannot be brought within 28.
pub fn parse_decimal_prefix(text: &[u8]) -> ParseResult<(Decimal, usize)> {
    let info = NumberCodec::decimal().tokenize(text)?;
    Ok((assemble_decimal(&info)?, info.end))
}

/// Parse all of `text` as a base-10 [`Decimal`].
///
/// # Errors
///
/// See [`parse_decimal_prefix`], plus [`ParseError::Format`] for trailing
/// bytes.
pub fn parse_decimal(text: &str) -> ParseResult<Decimal> {
    whole(text.as_bytes(), parse_decimal_prefix(text.as_bytes()))
}

/// Trailing zero digits of the scanned mantissa, fraction zeros included
fn trailing_zeros(info: &NumberInfo<'_>) -> usize {
    if !info.fraction.is_empty() {
        return info.fraction_zeros;
    }
    let integer = &info.text()[info.integer.begin..info.integer.end()];
    info.fraction_zeros + integer.iter().rev().take_while(|&&c| c == b'0').count()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn assemble_decimal(info: &NumberInfo<'_>) -> ParseResult<Decimal> {
    if info.radix() != 10 {
        return Err(ParseError::Format { position: 0 });
    }
    let range = ParseError::Range {
        position: info.integer.begin,
    };

    let fraction_len = i64::try_from(info.fraction.count + info.fraction_zeros).map_err(|_| range)?;
    let mut scale = fraction_len.saturating_sub(info.exponent_value());

    if info.is_zero() {
        return Ok(Decimal::new(0, scale.clamp(0, i64::from(MAX_DECIMAL_SCALE)) as u32));
    }

    // Mantissa digits: significant digits, kept fraction zeros, then padding
    let mut digit_count = info.integer.count + info.fraction.count + info.fraction_zeros;
    if scale > i64::from(MAX_DECIMAL_SCALE) {
        let excess = (scale - i64::from(MAX_DECIMAL_SCALE)) as usize;
        let dropped = excess.min(trailing_zeros(info));
        digit_count -= dropped;
        scale -= dropped as i64;
        if scale > i64::from(MAX_DECIMAL_SCALE) {
            return Err(range);
        }
    }
    if scale < 0 {
        digit_count = digit_count.saturating_add(usize::try_from(-scale).map_err(|_| range)?);
        scale = 0;
    }
    if digit_count > MAX_DECIMAL_DIGITS {
        return Err(range);
    }

    let codec = info.codec();
    let zeros = std::iter::repeat(0u8);
    let digits = info.digits().chain(zeros).take(digit_count);

    let mut limbs = [0u32; ACCUMULATOR_LIMBS];
    let mut len = 0;
    let mut chunk = 0u32;
    let mut in_chunk = 0;
    for d in digits {
        chunk = chunk * 10 + u32::from(d);
        in_chunk += 1;
        if in_chunk == codec.base_length {
            len = mul_scalar(&mut limbs, len, codec.base_divisor).0;
            len = add_scalar(&mut limbs, len, chunk).0;
            chunk = 0;
            in_chunk = 0;
        }
    }
    if in_chunk > 0 {
        len = mul_scalar(&mut limbs, len, codec.powers_u32[in_chunk]).0;
        len = add_scalar(&mut limbs, len, chunk).0;
    }
    if len > 3 {
        return Err(range);
    }

    let magnitude = limbs[..3]
        .iter()
        .rev()
        .fold(0i128, |acc, &limb| (acc << 32) | i128::from(limb));
    let mantissa = if info.is_negative { -magnitude } else { magnitude };
    Decimal::try_from_i128_with_scale(mantissa, scale as u32).map_err(|_| range)
}
