//! GUID text in the `8-4-4-4-12` hex layout.

use uuid::Uuid;

use crate::codec::{ascii_string, NumberCodec};
use crate::error::{ParseError, ParseResult};
use crate::integer::whole;

/// Length of the hyphenated form
pub const GUID_LEN: usize = 36;

/// Byte indices after which a group separator appears
const GROUP_ENDS: [usize; 4] = [3, 5, 7, 9];

/// Write `value` as lowercase hex groups, returning [`GUID_LEN`]
pub fn write_guid(value: &Uuid, out: &mut [u8]) -> usize {
    let hex = NumberCodec::hexadecimal();
    let mut pos = 0;
    for (i, &byte) in value.as_bytes().iter().enumerate() {
        hex.write_2_digits(u64::from(byte), &mut out[pos..]);
        pos += 2;
        if GROUP_ENDS.contains(&i) {
            out[pos] = b'-';
            pos += 1;
        }
    }
    pos
}

#[must_use]
pub fn format_guid(value: &Uuid) -> String {
    let mut buf = [0u8; GUID_LEN];
    let len = write_guid(value, &mut buf);
    ascii_string(&buf[..len])
}

/// Parse a GUID at the start of `text`.
///
/// Accepts optional surrounding braces and an optional `-` at each group
/// boundary. Hex digits are case-insensitive.
///
/// # Errors
///
/// [`ParseError::Empty`] for empty input and [`ParseError::Format`] at the
/// first byte that does not fit the layout.
pub fn parse_guid_prefix(text: &[u8]) -> ParseResult<(Uuid, usize)> {
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    let hex = NumberCodec::hexadecimal();
    let braced = text[0] == b'{';
    let mut pos = usize::from(braced);

    let mut bytes = [0u8; 16];
    for (i, byte) in bytes.iter_mut().enumerate() {
        let pair = text.get(pos..).unwrap_or_default();
        let value = hex
            .parse_fixed(pair, 2)
            .ok_or(ParseError::Format { position: pos })?;
        *byte = u8::try_from(value).map_err(|_| ParseError::Format { position: pos })?;
        pos += 2;
        if GROUP_ENDS.contains(&i) && text.get(pos) == Some(&b'-') {
            pos += 1;
        }
    }

    if braced {
        if text.get(pos) != Some(&b'}') {
            return Err(ParseError::Format { position: pos });
        }
        pos += 1;
    }
    Ok((Uuid::from_bytes(bytes), pos))
}

/// Parse all of `text` as a GUID.
///
/// # Errors
///
/// See [`parse_guid_prefix`].
pub fn parse_guid(text: &str) -> ParseResult<Uuid> {
    whole(text.as_bytes(), parse_guid_prefix(text.as_bytes()))
}
