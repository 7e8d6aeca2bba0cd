//! Per-radix codec instances and integer formatting.
//!
//! A [`NumberCodec`] owns every table derived from its radix. Instances are
//! built on first use, cached for the life of the process and never mutated
//! afterwards, so reads need no synchronization.

use std::sync::OnceLock;

use tracing::debug;

use crate::alphabet::{ALPHABET, ERROR_DIGIT};
use crate::error::UnsupportedRadix;

/// Smallest supported radix
pub const MIN_RADIX: u32 = 2;
/// Largest supported radix
pub const MAX_RADIX: u32 = 64;

/// Radices up to this value parse letters case-insensitively
const CASE_INSENSITIVE_LIMIT: u32 = 36;

static CODECS: [OnceLock<NumberCodec>; MAX_RADIX as usize + 1] =
    [const { OnceLock::new() }; MAX_RADIX as usize + 1];

/// Formatting and parsing for one radix
pub struct NumberCodec {
    pub(crate) radix: u32,
    pub(crate) case_sensitive: bool,
    /// Smallest digit that rounds up (half-radix, rounded up for odd radices)
    pub(crate) rounded: u64,
    /// Three-character rendering of every value below `radix^3`
    three_digits: Vec<[u8; 3]>,
    pub(crate) powers_u32: Vec<u32>,
    pub(crate) powers_u64: Vec<u64>,
    /// `radix^1, radix^2, ...` while finite
    pub(crate) positive_exponents: Vec<f64>,
    /// `radix^-1, radix^-2, ...` while non-zero
    pub(crate) negative_exponents: Vec<f64>,
    /// `radix^base_length`, the chunk size for big-integer conversions
    pub(crate) base_divisor: u32,
    pub(crate) base_length: usize,
    pub(crate) f64_digits: usize,
    pub(crate) f32_digits: usize,
}

impl NumberCodec {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn new(radix: u32) -> Self {
        let r = u64::from(radix);

        let mut powers_u64 = vec![1u64];
        while let Some(next) = powers_u64[powers_u64.len() - 1].checked_mul(r) {
            powers_u64.push(next);
        }
        let powers_u32: Vec<u32> = powers_u64
            .iter()
            .map_while(|&p| u32::try_from(p).ok())
            .collect();

        let cube = (r * r * r) as usize;
        let three_digits = (0..cube)
            .map(|i| {
                let i = i as u64;
                [
                    ALPHABET.digit_to_char((i / (r * r)) as u8),
                    ALPHABET.digit_to_char(((i / r) % r) as u8),
                    ALPHABET.digit_to_char((i % r) as u8),
                ]
            })
            .collect();

        let base = f64::from(radix);
        let mut positive_exponents = Vec::new();
        let mut p = base;
        while p.is_finite() {
            positive_exponents.push(p);
            p *= base;
        }
        let mut negative_exponents = Vec::new();
        let mut p = 1.0 / base;
        while p > 0.0 {
            negative_exponents.push(p);
            p /= base;
        }

        let base_length = powers_u32.len() - 1;
        let bits = base.log2();

        Self {
            radix,
            case_sensitive: radix > CASE_INSENSITIVE_LIMIT,
            rounded: r.div_ceil(2),
            three_digits,
            base_divisor: powers_u32[base_length],
            base_length,
            powers_u32,
            powers_u64,
            positive_exponents,
            negative_exponents,
            f64_digits: (53.0 / bits).floor() as usize,
            f32_digits: (24.0 / bits).floor() as usize,
        }
    }

    fn cached(radix: u32) -> &'static Self {
        CODECS[radix as usize].get_or_init(|| {
            debug!(radix, "building number codec tables");
            Self::new(radix)
        })
    }

    /// Codec for `radix`, built on first request.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedRadix`] if `radix` is outside `2..=64`.
    pub fn for_radix(radix: u32) -> Result<&'static Self, UnsupportedRadix> {
        if (MIN_RADIX..=MAX_RADIX).contains(&radix) {
            Ok(Self::cached(radix))
        } else {
            Err(UnsupportedRadix(radix))
        }
    }

    #[must_use]
    pub fn binary() -> &'static Self {
        Self::cached(2)
    }

    #[must_use]
    pub fn octal() -> &'static Self {
        Self::cached(8)
    }

    #[must_use]
    pub fn decimal() -> &'static Self {
        Self::cached(10)
    }

    #[must_use]
    pub fn hexadecimal() -> &'static Self {
        Self::cached(16)
    }

    #[must_use]
    pub const fn radix(&self) -> u32 {
        self.radix
    }

    /// Whether letters are distinguished by case when parsing
    #[must_use]
    pub const fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Whether `E`/`e` can introduce an exponent (it is a digit above radix 14)
    #[must_use]
    pub const fn accepts_exponent(&self) -> bool {
        self.radix <= 14
    }

    /// Value of `c` as a digit of this radix
    #[inline]
    pub(crate) fn digit_value(&self, c: u8) -> Option<u8> {
        let d = ALPHABET.char_to_digit(c, self.case_sensitive);
        (d != ERROR_DIGIT && u32::from(d) < self.radix).then_some(d)
    }

    /// Number of digits needed to write `value`
    #[must_use]
    pub fn get_length(&self, value: u64) -> usize {
        if self.radix == 10 {
            return decimal_length(value);
        }
        1 + self.powers_u64[1..].partition_point(|&p| p <= value)
    }

    /// Write exactly `width` digits of `value` (zero-padded, high digits
    /// beyond `width` are dropped) into `out[..width]`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn write_fixed(&self, mut value: u64, width: usize, out: &mut [u8]) {
        let r = u64::from(self.radix);
        let cube = self.powers_u64[3];
        let mut pos = width;
        while pos >= 3 {
            let idx = (value % cube) as usize;
            value /= cube;
            out[pos - 3..pos].copy_from_slice(&self.three_digits[idx]);
            pos -= 3;
        }
        while pos > 0 {
            out[pos - 1] = ALPHABET.digit_to_char((value % r) as u8);
            value /= r;
            pos -= 1;
        }
    }

    /// Write the last two digits of `value`
    #[allow(clippy::cast_possible_truncation)]
    pub fn write_2_digits(&self, value: u64, out: &mut [u8]) {
        let idx = (value % self.powers_u64[2]) as usize;
        out[..2].copy_from_slice(&self.three_digits[idx][1..]);
    }

    /// Write the last three digits of `value`
    #[allow(clippy::cast_possible_truncation)]
    pub fn write_3_digits(&self, value: u64, out: &mut [u8]) {
        let idx = (value % self.powers_u64[3]) as usize;
        out[..3].copy_from_slice(&self.three_digits[idx]);
    }

    /// Read exactly `width` digits from the start of `text`
    #[must_use]
    pub fn parse_fixed(&self, text: &[u8], width: usize) -> Option<u32> {
        if text.len() < width {
            return None;
        }
        text[..width].iter().try_fold(0u32, |acc, &c| {
            let d = self.digit_value(c)?;
            acc.checked_mul(self.radix)?.checked_add(u32::from(d))
        })
    }

    /// Write `value` into `out`, returning the number of bytes written.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than [`get_length`](Self::get_length).
    pub fn write_u64(&self, value: u64, out: &mut [u8]) -> usize {
        if self.radix == 10 {
            return self.write_decimal_u64(value, out);
        }
        let len = self.get_length(value);
        self.write_fixed(value, len, out);
        len
    }

    /// Base-10 specialization with a constant divisor
    #[allow(clippy::cast_possible_truncation)]
    fn write_decimal_u64(&self, mut value: u64, out: &mut [u8]) -> usize {
        let len = decimal_length(value);
        let mut pos = len;
        while pos >= 3 {
            let idx = (value % 1000) as usize;
            value /= 1000;
            out[pos - 3..pos].copy_from_slice(&self.three_digits[idx]);
            pos -= 3;
        }
        if pos == 2 {
            out[..2].copy_from_slice(&self.three_digits[value as usize][1..]);
        } else if pos == 1 {
            out[0] = b'0' + value as u8;
        }
        len
    }

    /// Write a signed value, returning the number of bytes written
    pub fn write_i64(&self, value: i64, out: &mut [u8]) -> usize {
        if value < 0 {
            out[0] = b'-';
            1 + self.write_u64(value.unsigned_abs(), &mut out[1..])
        } else {
            self.write_u64(value.unsigned_abs(), out)
        }
    }

    #[must_use]
    pub fn format_u64(&self, value: u64) -> String {
        let mut buf = [0u8; 64];
        let len = self.write_u64(value, &mut buf);
        ascii_string(&buf[..len])
    }

    #[must_use]
    pub fn format_i64(&self, value: i64) -> String {
        let mut buf = [0u8; 65];
        let len = self.write_i64(value, &mut buf);
        ascii_string(&buf[..len])
    }
}

impl std::fmt::Debug for NumberCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberCodec")
            .field("radix", &self.radix)
            .field("case_sensitive", &self.case_sensitive)
            .finish_non_exhaustive()
    }
}

/// Digit count of a base-10 value
#[must_use]
pub const fn decimal_length(v: u64) -> usize {
    if v < 10_000_000_000 {
        if v < 100_000 {
            if v < 100 {
                if v < 10 {
                    1
                } else {
                    2
                }
            } else if v < 1_000 {
                3
            } else if v < 10_000 {
                4
            } else {
                5
            }
        } else if v < 10_000_000 {
            if v < 1_000_000 {
                6
            } else {
                7
            }
        } else if v < 100_000_000 {
            8
        } else if v < 1_000_000_000 {
            9
        } else {
            10
        }
    } else if v < 1_000_000_000_000_000 {
        if v < 1_000_000_000_000 {
            if v < 100_000_000_000 {
                11
            } else {
                12
            }
        } else if v < 10_000_000_000_000 {
            13
        } else if v < 100_000_000_000_000 {
            14
        } else {
            15
        }
    } else if v < 10_000_000_000_000_000 {
        16
    } else if v < 100_000_000_000_000_000 {
        17
    } else if v < 1_000_000_000_000_000_000 {
        18
    } else if v < 10_000_000_000_000_000_000 {
        19
    } else {
        20
    }
}

/// Bytes produced by the writers in this crate are always UTF-8
pub(crate) fn ascii_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
