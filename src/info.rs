//! Lexical scan of a numeric literal.
//!
//! [`NumberInfo`] records where the sign, integer, fractional and exponent
//! parts of a literal sit inside the caller's buffer without interpreting
//! their magnitude, so one scan can be materialized as several target
//! types.

use rust_decimal::Decimal;

use crate::codec::NumberCodec;
use crate::error::{ParseError, ParseResult};
use crate::integer::read_sign;

/// Half-open range of bytes inside the scanned buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub begin: usize,
    pub count: usize,
}

impl Span {
    const fn new(begin: usize, end: usize) -> Self {
        Self {
            begin,
            count: end - begin,
        }
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.begin + self.count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Token describing a scanned numeric literal
#[derive(Debug, Clone, Copy)]
pub struct NumberInfo<'a> {
    text: &'a [u8],
    codec: &'a NumberCodec,
    pub is_negative: bool,
    /// A decimal point or an exponent was present
    pub is_float: bool,
    pub exponent_is_negative: bool,
    /// Integer digits without leading zeros
    pub integer: Span,
    /// Fractional digits without trailing zeros
    pub fraction: Span,
    /// Number of trailing zeros trimmed from `fraction`
    pub fraction_zeros: usize,
    /// Exponent digits, without marker or sign
    pub exponent: Span,
    /// Total bytes consumed
    pub end: usize,
}

impl NumberCodec {
    /// Scan the numeric literal at the start of `text`.
    ///
    /// Scanning stops at the first byte that cannot continue the literal;
    /// [`NumberInfo::end`] tells how far it got.
    ///
    /// # Errors
    ///
    /// [`ParseError::Empty`] for empty input and [`ParseError::Format`] when
    /// the literal contains no digit at all.
    pub fn tokenize<'a>(&'a self, text: &'a [u8]) -> ParseResult<NumberInfo<'a>> {
        let (is_negative, start) = read_sign(text)?;
        let is_digit = |pos: usize| text.get(pos).and_then(|&c| self.digit_value(c)).is_some();

        let mut pos = start;
        while text.get(pos) == Some(&b'0') {
            pos += 1;
        }
        let int_begin = pos;
        while is_digit(pos) {
            pos += 1;
        }
        let integer = Span::new(int_begin, pos);
        let mut saw_digit = pos > start;

        let mut is_float = false;
        let mut fraction = Span::new(pos, pos);
        let mut fraction_zeros = 0;
        if text.get(pos) == Some(&b'.') {
            let begin = pos + 1;
            let mut frac_end = begin;
            while is_digit(frac_end) {
                frac_end += 1;
            }
            if saw_digit || frac_end > begin {
                saw_digit = true;
                is_float = true;
                let mut significant = frac_end;
                while significant > begin && text[significant - 1] == b'0' {
                    significant -= 1;
                }
                fraction = Span::new(begin, significant);
                fraction_zeros = frac_end - significant;
                pos = frac_end;
            }
        }
        if !saw_digit {
            return Err(ParseError::Format { position: pos });
        }

        let mut exponent = Span::new(pos, pos);
        let mut exponent_is_negative = false;
        if self.read_exponent(text, pos).is_some() {
            let sign_at = pos + 1;
            exponent_is_negative = text.get(sign_at) == Some(&b'-');
            let mut begin = sign_at;
            if matches!(text.get(sign_at), Some(b'-' | b'+')) {
                begin += 1;
            }
            let mut exp_end = begin;
            while is_digit(exp_end) {
                exp_end += 1;
            }
            exponent = Span::new(begin, exp_end);
            is_float = true;
            pos = exp_end;
        }

        Ok(NumberInfo {
            text,
            codec: self,
            is_negative,
            is_float,
            exponent_is_negative,
            integer,
            fraction,
            fraction_zeros,
            exponent,
            end: pos,
        })
    }
}

impl<'a> NumberInfo<'a> {
    #[must_use]
    pub const fn radix(&self) -> u32 {
        self.codec.radix
    }

    /// The buffer the spans index into
    #[must_use]
    pub const fn text(&self) -> &'a [u8] {
        self.text
    }

    #[must_use]
    pub const fn codec(&self) -> &'a NumberCodec {
        self.codec
    }

    /// The scanned literal itself
    #[must_use]
    pub fn literal(&self) -> &'a [u8] {
        &self.text[..self.end]
    }

    /// Value of the explicit exponent, saturated well beyond any target
    /// type's range
    #[must_use]
    pub fn exponent_value(&self) -> i64 {
        let digits = &self.text[self.exponent.begin..self.exponent.end()];
        let magnitude = digits.iter().fold(0i64, |acc, &c| {
            let d = self.codec.digit_value(c).map_or(0, i64::from);
            (acc * i64::from(self.codec.radix) + d).min(100_000)
        });
        if self.exponent_is_negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Significant digit values: integer digits followed by fractional ones
    pub fn digits(&self) -> impl Iterator<Item = u8> + 'a {
        let codec = self.codec;
        let text = self.text;
        text[self.integer.begin..self.integer.end()]
            .iter()
            .chain(&text[self.fraction.begin..self.fraction.end()])
            .filter_map(move |&c| codec.digit_value(c))
    }

    /// True when every digit is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.integer.is_empty() && self.fraction.is_empty()
    }

    /// Integer part after applying the exponent, truncated toward zero
    fn magnitude(&self, limit: u64) -> ParseResult<u64> {
        let range = ParseError::Range {
            position: self.integer.begin,
        };
        let integer_digits = i64::try_from(self.integer.count).unwrap_or(i64::MAX);
        let effective = integer_digits.saturating_add(self.exponent_value());
        if effective <= 0 || self.is_zero() {
            return Ok(0);
        }
        let effective = usize::try_from(effective).unwrap_or(usize::MAX);

        let r = u64::from(self.codec.radix);
        let mut taken = 0usize;
        let mut value = 0u64;
        for d in self.digits().take(effective) {
            value = value
                .checked_mul(r)
                .and_then(|v| v.checked_add(u64::from(d)))
                .filter(|&v| v <= limit)
                .ok_or(range)?;
            taken += 1;
        }
        let padding = i64::try_from(effective - taken).unwrap_or(i64::MAX);
        self.codec
            .shift_integer(value, padding, limit, self.integer.begin)
    }

    /// Materialize as `u64`.
    ///
    /// # Errors
    ///
    /// [`ParseError::Range`] if the value is negative or exceeds `u64::MAX`.
    pub fn to_u64(&self) -> ParseResult<u64> {
        let value = self.magnitude(u64::MAX)?;
        if self.is_negative && value != 0 {
            return Err(ParseError::Range { position: 0 });
        }
        Ok(value)
    }

    /// Materialize as `i64`.
    ///
    /// # Errors
    ///
    /// [`ParseError::Range`] if the value does not fit.
    pub fn to_i64(&self) -> ParseResult<i64> {
        if self.is_negative {
            let value = self.magnitude(i64::MIN.unsigned_abs())?;
            0i64.checked_sub_unsigned(value)
                .ok_or(ParseError::Range { position: 0 })
        } else {
            let value = self.magnitude(i64::MAX.unsigned_abs())?;
            i64::try_from(value).map_err(|_| ParseError::Range { position: 0 })
        }
    }

    /// Materialize as `f64`.
    ///
    /// # Errors
    ///
    /// [`ParseError::Range`] if the exponent magnitude reaches 1024 or the
    /// value overflows to infinity.
    pub fn to_f64(&self) -> ParseResult<f64> {
        self.codec.assemble_f64(self)
    }

    /// Materialize as `f32`.
    ///
    /// # Errors
    ///
    /// As for [`to_f64`](Self::to_f64).
    pub fn to_f32(&self) -> ParseResult<f32> {
        self.codec.assemble_f32(self)
    }

    /// Materialize as a [`Decimal`]. Only base-10 literals are accepted.
    ///
    /// # Errors
    ///
    /// [`ParseError::Format`] for other radices, [`ParseError::Range`] when
    /// the mantissa needs more than 96 bits or the scale cannot be brought
    /// within 28.
    pub fn to_decimal(&self) -> ParseResult<Decimal> {
        crate::decimal::assemble_decimal(self)
    }
}
