use thiserror::Error;

/// Broad classification of a parse failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    #[error("invalid format")]
    Format,

    #[error("value out of range")]
    Range,

    #[error("empty input")]
    EmptyInput,
}

/// Errors that can occur while parsing text into a numeric value
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseError {
    #[error("invalid format at offset {position}")]
    Format { position: usize },

    #[error("value out of range for the target type (offset {position})")]
    Range { position: usize },

    #[error("empty input")]
    Empty,
}

impl ParseError {
    /// The error category, independent of where it happened
    #[must_use]
    pub const fn kind(&self) -> ParseErrorKind {
        match self {
            Self::Format { .. } => ParseErrorKind::Format,
            Self::Range { .. } => ParseErrorKind::Range,
            Self::Empty => ParseErrorKind::EmptyInput,
        }
    }

    /// Byte offset at which parsing stopped (0 for empty input)
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::Format { position } | Self::Range { position } => *position,
            Self::Empty => 0,
        }
    }
}

/// Returned when a codec is requested for a radix outside `2..=64`
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unsupported radix {0}: expected a value in 2..=64")]
pub struct UnsupportedRadix(pub u32);

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Unwrap a parse result, panicking with the error message on failure.
///
/// This is the "strict" call style for callers that treat malformed input
/// as a bug rather than a recoverable condition.
///
/// # Panics
///
/// Panics if `result` is an error.
#[track_caller]
pub fn strict<T>(result: ParseResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("strict parse failed: {e}"),
    }
}
