//! Digit alphabet shared by every radix.
//!
//! Values 0..64 map to `0-9`, `a-z`, `A-Z`, `~`, `!`. Two reverse tables
//! exist: a case-sensitive one covering all 64 symbols, and a
//! case-insensitive one where both letter cases map to 10..36.

/// Sentinel returned for characters that are not digits in any radix
pub const ERROR_DIGIT: u8 = 0xFF;

const SYMBOLS: &[u8; 64] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ~!";

/// Forward and reverse digit tables
pub struct RadixAlphabet {
    digit_of: [u8; 64],
    case_sensitive: [u8; 128],
    case_insensitive: [u8; 128],
}

impl RadixAlphabet {
    const fn build() -> Self {
        let mut case_sensitive = [ERROR_DIGIT; 128];
        let mut case_insensitive = [ERROR_DIGIT; 128];

        let mut i = 0;
        while i < 64 {
            case_sensitive[SYMBOLS[i] as usize] = i as u8;
            i += 1;
        }

        let mut i = 0;
        while i < 36 {
            let c = SYMBOLS[i];
            case_insensitive[c as usize] = i as u8;
            if c.is_ascii_lowercase() {
                case_insensitive[c.to_ascii_uppercase() as usize] = i as u8;
            }
            i += 1;
        }

        Self {
            digit_of: *SYMBOLS,
            case_sensitive,
            case_insensitive,
        }
    }

    /// Character for digit value `value` (must be below 64)
    #[inline]
    #[must_use]
    pub const fn digit_to_char(&self, value: u8) -> u8 {
        self.digit_of[value as usize]
    }

    /// Digit value of `c`, or [`ERROR_DIGIT`] when `c` is not a digit.
    ///
    /// The caller still has to compare the result against its radix.
    #[inline]
    #[must_use]
    pub const fn char_to_digit(&self, c: u8, case_sensitive: bool) -> u8 {
        if c >= 128 {
            return ERROR_DIGIT;
        }
        if case_sensitive {
            self.case_sensitive[c as usize]
        } else {
            self.case_insensitive[c as usize]
        }
    }
}

pub static ALPHABET: RadixAlphabet = RadixAlphabet::build();
