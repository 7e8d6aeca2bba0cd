//! Direct single-pass parsers for `u64` and `i64`.
//!
//! Each `*_prefix` parser reads the longest number at the start of the input
//! and reports how many bytes it consumed. The first byte that is not a
//! digit of the radix ends the number without being an error; the
//! whole-input parsers turn leftover bytes into a format error.

use crate::codec::NumberCodec;
use crate::error::{ParseError, ParseResult};

/// Exponent shifts are applied this many digits at a time
const SHIFT_CHUNK: usize = 5;

/// Exponents are saturated here; anything larger overflows every target
const EXPONENT_CAP: u64 = 100_000;

#[derive(Clone, Copy)]
struct Signed {
    negative: bool,
    magnitude: u64,
    end: usize,
}

/// Require that a prefix parse consumed the whole input
pub(crate) fn whole<T>(text: &[u8], result: ParseResult<(T, usize)>) -> ParseResult<T> {
    let (value, consumed) = result?;
    if consumed == text.len() {
        Ok(value)
    } else {
        Err(ParseError::Format { position: consumed })
    }
}

/// Read an optional leading sign, returning (negative, next position)
pub(crate) fn read_sign(text: &[u8]) -> ParseResult<(bool, usize)> {
    match text.first() {
        None => Err(ParseError::Empty),
        Some(b'-') => Ok((true, 1)),
        Some(b'+') => Ok((false, 1)),
        Some(_) => Ok((false, 0)),
    }
}

impl NumberCodec {
    /// Accumulate digits starting at `pos` while the value stays within
    /// `limit`. Returns the value and the position after the last digit.
    fn accumulate(&self, text: &[u8], mut pos: usize, limit: u64) -> ParseResult<(u64, usize)> {
        let r = u64::from(self.radix);
        let first = pos;
        while pos < text.len() && text[pos] == b'0' {
            pos += 1;
        }

        // Fewer digits than this can never exceed `limit`
        let unchecked = self.powers_u64.len() - 2;
        let mut value = 0u64;
        let mut count = 0;
        while let Some(d) = text.get(pos).and_then(|&c| self.digit_value(c)) {
            if count < unchecked {
                value = value * r + u64::from(d);
            } else {
                value = value
                    .checked_mul(r)
                    .and_then(|v| v.checked_add(u64::from(d)))
                    .filter(|&v| v <= limit)
                    .ok_or(ParseError::Range { position: pos })?;
            }
            count += 1;
            pos += 1;
        }

        if pos == first {
            return Err(ParseError::Format { position: pos });
        }
        if value > limit {
            return Err(ParseError::Range { position: first });
        }
        Ok((value, pos))
    }

    fn parse_signed(&self, text: &[u8], positive_limit: u64, negative_limit: u64) -> ParseResult<Signed> {
        let (negative, start) = read_sign(text)?;
        let limit = if negative { negative_limit } else { positive_limit };
        let (magnitude, end) = self.accumulate(text, start, limit)?;
        Ok(Signed {
            negative,
            magnitude,
            end,
        })
    }

    /// Like [`parse_signed`](Self::parse_signed) but also accepts a fractional
    /// part and, for radices that allow it, an `E` exponent. Fractional
    /// digits are folded into the accumulator and the net exponent shifts
    /// the value, truncating toward zero.
    fn parse_signed_exp(&self, text: &[u8], positive_limit: u64, negative_limit: u64) -> ParseResult<Signed> {
        let (negative, start) = read_sign(text)?;
        let limit = if negative { negative_limit } else { positive_limit };
        let r = u64::from(self.radix);

        let mut pos = start;
        let mut value = 0u64;
        let mut digits = 0usize;
        let mut overflowed_at = None;
        while let Some(d) = text.get(pos).and_then(|&c| self.digit_value(c)) {
            if overflowed_at.is_none() {
                match value.checked_mul(r).and_then(|v| v.checked_add(u64::from(d))) {
                    Some(v) => value = v,
                    None => overflowed_at = Some(pos),
                }
            }
            digits += 1;
            pos += 1;
        }
        // Integer digits that did not fit still count toward the magnitude
        let mut shift: i64 = match overflowed_at {
            Some(at) => i64::try_from(pos - at).unwrap_or(i64::MAX),
            None => 0,
        };

        if text.get(pos) == Some(&b'.') {
            let mut frac = pos + 1;
            while let Some(d) = text.get(frac).and_then(|&c| self.digit_value(c)) {
                if overflowed_at.is_none() {
                    match value.checked_mul(r).and_then(|v| v.checked_add(u64::from(d))) {
                        Some(v) => {
                            value = v;
                            shift -= 1;
                        }
                        None => overflowed_at = Some(frac),
                    }
                }
                digits += 1;
                frac += 1;
            }
            if digits > 0 {
                pos = frac;
            }
        }
        if digits == 0 {
            return Err(ParseError::Format { position: pos });
        }

        if let Some((exp, end)) = self.read_exponent(text, pos) {
            shift = shift.saturating_add(exp);
            pos = end;
        }

        let value = self.shift_integer(value, shift, limit, start)?;
        Ok(Signed {
            negative,
            magnitude: value,
            end: pos,
        })
    }

    /// Parse `[eE][+-]digits` at `pos` when this radix has an exponent
    /// marker. Returns `None`, consuming nothing, if no complete exponent is
    /// present.
    pub(crate) fn read_exponent(&self, text: &[u8], pos: usize) -> Option<(i64, usize)> {
        if !self.accepts_exponent() || !matches!(text.get(pos), Some(b'e' | b'E')) {
            return None;
        }
        let mut at = pos + 1;
        let negative = match text.get(at) {
            Some(b'-') => {
                at += 1;
                true
            }
            Some(b'+') => {
                at += 1;
                false
            }
            _ => false,
        };
        let first = at;
        let mut exp = 0u64;
        while let Some(d) = text.get(at).and_then(|&c| self.digit_value(c)) {
            exp = (exp * u64::from(self.radix) + u64::from(d)).min(EXPONENT_CAP);
            at += 1;
        }
        if at == first {
            return None;
        }
        #[allow(clippy::cast_possible_wrap)]
        let exp = exp as i64;
        Some((if negative { -exp } else { exp }, at))
    }

    /// Multiply (positive `shift`) or divide (negative `shift`) by powers of
    /// the radix, a few digits at a time, failing as soon as `limit` is
    /// exceeded.
    pub(crate) fn shift_integer(&self, mut value: u64, shift: i64, limit: u64, position: usize) -> ParseResult<u64> {
        if value == 0 {
            return Ok(0);
        }
        let range = ParseError::Range { position };
        let mut remaining = usize::try_from(shift.unsigned_abs()).unwrap_or(usize::MAX);
        if shift > 0 {
            while remaining > 0 {
                let step = remaining.min(SHIFT_CHUNK);
                value = value
                    .checked_mul(self.powers_u64[step])
                    .filter(|&v| v <= limit)
                    .ok_or(range)?;
                remaining -= step;
            }
        } else {
            while remaining > 0 && value > 0 {
                let step = remaining.min(SHIFT_CHUNK);
                value /= self.powers_u64[step];
                remaining -= step;
            }
        }
        if value > limit {
            return Err(range);
        }
        Ok(value)
    }

    /// Parse a `u64` at the start of `text`, returning it with the number of
    /// bytes consumed.
    ///
    /// # Errors
    ///
    /// [`ParseError::Empty`] for empty input, [`ParseError::Format`] when no
    /// digit follows the optional sign, [`ParseError::Range`] when the value
    /// exceeds `u64::MAX` or is negative.
    pub fn parse_u64_prefix(&self, text: &[u8]) -> ParseResult<(u64, usize)> {
        let s = self.parse_signed(text, u64::MAX, 0)?;
        Ok((s.magnitude, s.end))
    }

    /// Parse an `i64` at the start of `text`.
    ///
    /// # Errors
    ///
    /// As for [`parse_u64_prefix`](Self::parse_u64_prefix), with the range
    /// `i64::MIN..=i64::MAX`.
    pub fn parse_i64_prefix(&self, text: &[u8]) -> ParseResult<(i64, usize)> {
        let s = self.parse_signed(text, i64::MAX.unsigned_abs(), i64::MIN.unsigned_abs())?;
        Ok((apply_sign(s)?, s.end))
    }

    /// Parse a `u64` that may carry a fractional part and an exponent
    /// (`"1.5E3"` is 1500). Excess fractional digits are truncated.
    ///
    /// # Errors
    ///
    /// As for [`parse_u64_prefix`](Self::parse_u64_prefix).
    pub fn parse_u64_exp_prefix(&self, text: &[u8]) -> ParseResult<(u64, usize)> {
        let s = self.parse_signed_exp(text, u64::MAX, 0)?;
        Ok((s.magnitude, s.end))
    }

    /// Signed counterpart of [`parse_u64_exp_prefix`](Self::parse_u64_exp_prefix).
    ///
    /// # Errors
    ///
    /// As for [`parse_i64_prefix`](Self::parse_i64_prefix).
    pub fn parse_i64_exp_prefix(&self, text: &[u8]) -> ParseResult<(i64, usize)> {
        let s = self.parse_signed_exp(text, i64::MAX.unsigned_abs(), i64::MIN.unsigned_abs())?;
        Ok((apply_sign(s)?, s.end))
    }

    /// Parse all of `text` as a `u64`.
    ///
    /// # Errors
    ///
    /// As for [`parse_u64_prefix`](Self::parse_u64_prefix), plus
    /// [`ParseError::Format`] at the first byte that is not part of the number.
    pub fn parse_u64(&self, text: &str) -> ParseResult<u64> {
        whole(text.as_bytes(), self.parse_u64_prefix(text.as_bytes()))
    }

    /// Parse all of `text` as an `i64`.
    ///
    /// # Errors
    ///
    /// See [`parse_u64`](Self::parse_u64).
    pub fn parse_i64(&self, text: &str) -> ParseResult<i64> {
        whole(text.as_bytes(), self.parse_i64_prefix(text.as_bytes()))
    }
}

fn apply_sign(s: Signed) -> ParseResult<i64> {
    if s.negative {
        0i64.checked_sub_unsigned(s.magnitude)
            .ok_or(ParseError::Range { position: 0 })
    } else {
        i64::try_from(s.magnitude).map_err(|_| ParseError::Range { position: 0 })
    }
}
