//! # numtext
//!
//! Text formatting and parsing for numbers in any radix from 2 to 64, plus
//! fixed-layout codecs for decimals, GUIDs and ISO-8601 timestamps.
//!
//! - **Radix codecs**: one [`NumberCodec`] per radix, built on first use and
//!   shared for the life of the process
//! - **Exact round trips**: integers, [`Decimal`]s, GUIDs and base-10 floats
//!   read back to the identical value
//! - **Slice based**: every writer fills a caller buffer and returns the
//!   written length; every prefix parser reports how many bytes it consumed
//! - **One scan, many types**: [`NumberCodec::tokenize`] records the parts of
//!   a literal once so it can be read as any numeric type
//!
//! ## Examples
//!
//! ```rust
//! use numtext::{NumberCodec, ParseErrorKind};
//!
//! let hex = NumberCodec::hexadecimal();
//! assert_eq!(hex.format(&255u64), "ff");
//! assert_eq!(hex.parse::<f64>("ff.8"), Ok(255.5));
//!
//! let dec = NumberCodec::decimal();
//! assert_eq!(dec.format(&0.1f64), "0.1");
//! let overflow = dec.parse::<u64>("18446744073709551616").unwrap_err();
//! assert_eq!(overflow.kind(), ParseErrorKind::Range);
//!
//! // Crate-level helpers use base 10
//! let value: i64 = numtext::parse("-42").unwrap();
//! assert_eq!(numtext::format(&value), "-42");
//! ```
//!
//! ## Text Forms
//!
//! - Digits come from `0-9a-zA-Z~!`; radices up to 36 read letters in either
//!   case, larger radices are case-sensitive
//! - Floats switch to scientific form (`1.5E+20`, `1E-6`) outside the range
//!   where the fixed form stays short; exponent digits use the codec's radix
//! - `NaN`, `∞` and `-∞` stand for the non-finite floats
//! - Timestamps are written as `YYYY-MM-DDTHH:mm:ss.fff` with `Z` or `±HH:mm`

pub(crate) mod alphabet;
pub(crate) mod codec;
pub(crate) mod datetime;
pub(crate) mod decimal;
pub(crate) mod error;
pub(crate) mod float;
pub(crate) mod guid;
pub(crate) mod info;
pub(crate) mod integer;
pub(crate) mod limb;
pub(crate) mod textual;

// Re-export main types and functions
pub use alphabet::{RadixAlphabet, ALPHABET};
pub use codec::{decimal_length, NumberCodec, MAX_RADIX, MIN_RADIX};
pub use datetime::{DateTimeCodec, MAX_DATETIME_LEN};
pub use decimal::{
    format_decimal, parse_decimal, parse_decimal_prefix, write_decimal, MAX_DECIMAL_LEN,
    MAX_DECIMAL_SCALE,
};
pub use error::{strict, ParseError, ParseErrorKind, ParseResult, UnsupportedRadix};
pub use float::{INFINITY_SYMBOL, MAX_FLOAT_LEN, NAN_SYMBOL};
pub use guid::{format_guid, parse_guid, parse_guid_prefix, write_guid, GUID_LEN};
pub use info::{NumberInfo, Span};
pub use limb::{add_scalar, div_scalar, mul_scalar, sub_scalar, BigUnsigned};
pub use textual::{FormatRadix, ParseRadix, MAX_FORMATTED_LEN};

pub use chrono::{DateTime, FixedOffset};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;

/// Format `value` in base 10
#[must_use]
pub fn format<T: FormatRadix + ?Sized>(value: &T) -> String {
    NumberCodec::decimal().format(value)
}

/// Parse all of `text` in base 10.
///
/// # Errors
///
/// Any [`ParseError`] reported by `T`'s parser.
pub fn parse<T: ParseRadix>(text: &str) -> ParseResult<T> {
    NumberCodec::decimal().parse(text)
}
