//! ISO-8601 timestamps.
//!
//! Output is always `YYYY-MM-DDTHH:mm:ss.fff` followed by `Z` or `±HH:mm`.
//! Input accepts calendar, ordinal and week dates in basic or extended
//! form, an optional time and an optional zone. The parser runs left to
//! right through date, time and zone phases and fails on the first
//! unexpected byte.

use std::sync::OnceLock;

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Weekday,
};
use tracing::debug;

use crate::codec::{ascii_string, NumberCodec};

/// Length of the longest formatted timestamp
pub const MAX_DATETIME_LEN: usize = 29;

/// ISO weekday numbers 1 through 7
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

static LOCAL_OFFSET: OnceLock<FixedOffset> = OnceLock::new();

/// Offset applied to input without a zone, captured on first use
fn local_offset() -> FixedOffset {
    *LOCAL_OFFSET.get_or_init(|| {
        let offset = *Local::now().offset();
        debug!(seconds = offset.local_minus_utc(), "captured local UTC offset");
        offset
    })
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Date,
    Time,
    Zone,
    Done,
}

/// Read position over the input
struct Cursor<'a> {
    digits: &'a NumberCodec,
    text: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.text.get(self.pos + offset).copied()
    }

    fn remaining(&self) -> usize {
        self.text.len() - self.pos
    }

    fn at_end(&self) -> bool {
        self.pos == self.text.len()
    }

    fn eat(&mut self, accept: impl Fn(u8) -> bool) -> Option<u8> {
        let c = self.peek().filter(|&c| accept(c))?;
        self.pos += 1;
        Some(c)
    }

    fn number(&mut self, width: usize) -> Option<u32> {
        let value = self.digits.parse_fixed(&self.text[self.pos..], width)?;
        self.pos += width;
        Some(value)
    }

    /// Skip one separator between date fields
    fn skip_separator(&mut self) {
        self.eat(|c| !c.is_ascii_alphanumeric());
    }

    fn has_digits(&self, width: usize) -> bool {
        (0..width).all(|i| self.peek_at(i).is_some_and(|c| c.is_ascii_digit()))
    }
}

/// ISO-8601 formatter and parser over the base-10 codec
#[derive(Debug, Clone, Copy)]
pub struct DateTimeCodec {
    digits: &'static NumberCodec,
}

impl Default for DateTimeCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl DateTimeCodec {
    #[must_use]
    pub fn new() -> Self {
        Self {
            digits: NumberCodec::decimal(),
        }
    }

    /// Write `value` in its own offset, returning the number of bytes
    /// written. `out` must hold [`MAX_DATETIME_LEN`] bytes.
    ///
    /// # Panics
    ///
    /// Panics if the local year is outside `0..=9999`.
    pub fn format_into(&self, value: &DateTime<FixedOffset>, out: &mut [u8]) -> usize {
        let pos = self.write_local(&value.naive_local(), out);
        pos + self.write_offset(value.offset().local_minus_utc(), &mut out[pos..])
    }

    /// Format `value` in its own offset.
    ///
    /// # Panics
    ///
    /// See [`format_into`](Self::format_into).
    #[must_use]
    pub fn format(&self, value: &DateTime<FixedOffset>) -> String {
        let mut buf = [0u8; MAX_DATETIME_LEN];
        let len = self.format_into(value, &mut buf);
        ascii_string(&buf[..len])
    }

    /// Format `value` converted to UTC, with a `Z` suffix.
    ///
    /// # Panics
    ///
    /// Panics if the UTC year is outside `0..=9999`.
    #[must_use]
    pub fn format_utc<Tz: TimeZone>(&self, value: &DateTime<Tz>) -> String {
        let mut buf = [0u8; MAX_DATETIME_LEN];
        let mut len = self.write_local(&value.naive_utc(), &mut buf);
        buf[len] = b'Z';
        len += 1;
        ascii_string(&buf[..len])
    }

    fn write_local(&self, value: &NaiveDateTime, out: &mut [u8]) -> usize {
        let year = value.year();
        assert!(
            (0..=9999).contains(&year),
            "year {year} cannot be written with four digits"
        );
        let d = self.digits;
        d.write_fixed(u64::from(year.unsigned_abs()), 4, out);
        out[4] = b'-';
        d.write_2_digits(u64::from(value.month()), &mut out[5..]);
        out[7] = b'-';
        d.write_2_digits(u64::from(value.day()), &mut out[8..]);
        out[10] = b'T';
        d.write_2_digits(u64::from(value.hour()), &mut out[11..]);
        out[13] = b':';
        d.write_2_digits(u64::from(value.minute()), &mut out[14..]);
        out[16] = b':';
        d.write_2_digits(u64::from(value.second()), &mut out[17..]);
        out[19] = b'.';
        // leap seconds carry nanoseconds past one second
        let millis = (value.nanosecond() / 1_000_000).min(999);
        d.write_3_digits(u64::from(millis), &mut out[20..]);
        23
    }

    fn write_offset(&self, seconds: i32, out: &mut [u8]) -> usize {
        if seconds == 0 {
            out[0] = b'Z';
            return 1;
        }
        let magnitude = seconds.unsigned_abs();
        let hours = magnitude / 3600;
        assert!(hours < 100, "UTC offset of {hours} hours is out of range");
        out[0] = if seconds < 0 { b'-' } else { b'+' };
        self.digits.write_2_digits(u64::from(hours), &mut out[1..]);
        out[3] = b':';
        self.digits
            .write_2_digits(u64::from(magnitude % 3600 / 60), &mut out[4..]);
        6
    }

    /// Parse an ISO-8601 timestamp.
    ///
    /// Without a zone the value is taken to be in the local offset that was
    /// in effect when the first such input was parsed. Returns `None` for
    /// anything that does not match the grammar or names an invalid date
    /// or time.
    #[must_use]
    pub fn parse(&self, text: &str) -> Option<DateTime<FixedOffset>> {
        let mut cursor = Cursor {
            digits: self.digits,
            text: text.as_bytes(),
            pos: 0,
        };
        let mut date = None;
        let mut time = NaiveTime::MIN;
        let mut offset = None;

        let mut phase = Phase::Date;
        loop {
            phase = match phase {
                Phase::Date => {
                    date = Some(parse_date(&mut cursor)?);
                    if matches!(cursor.peek(), Some(b'T' | b't' | b' ')) {
                        Phase::Time
                    } else {
                        Phase::Zone
                    }
                }
                Phase::Time => {
                    time = parse_time(&mut cursor)?;
                    Phase::Zone
                }
                Phase::Zone => {
                    offset = Some(parse_zone(&mut cursor)?);
                    Phase::Done
                }
                Phase::Done => break,
            };
        }

        if !cursor.at_end() {
            return None;
        }
        NaiveDateTime::new(date?, time)
            .and_local_timezone(offset?)
            .single()
    }
}

fn parse_date(cursor: &mut Cursor<'_>) -> Option<NaiveDate> {
    let year = i32::try_from(cursor.number(4)?).ok()?;
    cursor.skip_separator();

    if cursor.eat(|c| c == b'W' || c == b'w').is_some() {
        let week = cursor.number(2)?;
        // a space here starts the time, not the weekday
        if cursor.peek() != Some(b' ') {
            cursor.skip_separator();
        }
        let weekday = if cursor.has_digits(1) {
            let day = usize::try_from(cursor.number(1)?).ok()?;
            *WEEKDAYS.get(day.checked_sub(1)?)?
        } else {
            Weekday::Mon
        };
        return NaiveDate::from_isoywd_opt(year, week, weekday);
    }

    let ordinal = cursor.remaining() == 3
        || matches!(cursor.peek_at(3), Some(b'T' | b't' | b' '));
    if ordinal {
        return NaiveDate::from_yo_opt(year, cursor.number(3)?);
    }

    let month = cursor.number(2)?;
    cursor.skip_separator();
    let day = cursor.number(2)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_time(cursor: &mut Cursor<'_>) -> Option<NaiveTime> {
    cursor.eat(|c| matches!(c, b'T' | b't' | b' '))?;
    let hour = cursor.number(2)?;
    let mut minute = 0;
    let mut second = 0;
    let mut millis = 0;

    cursor.eat(|c| c == b':');
    if cursor.has_digits(2) {
        minute = cursor.number(2)?;
        cursor.eat(|c| c == b':');
        if cursor.has_digits(2) {
            second = cursor.number(2)?;
            if cursor.eat(|c| c == b'.' || c == b',').is_some() {
                if !cursor.has_digits(1) {
                    return None;
                }
                let mut scale = 100;
                while let Some(c) = cursor.eat(|c| c.is_ascii_digit()) {
                    millis += u32::from(c - b'0') * scale;
                    scale /= 10;
                }
            }
        }
    }
    NaiveTime::from_hms_milli_opt(hour, minute, second, millis)
}

fn parse_zone(cursor: &mut Cursor<'_>) -> Option<FixedOffset> {
    let Some(c) = cursor.peek() else {
        return Some(local_offset());
    };
    match c {
        b'Z' | b'z' => {
            cursor.pos += 1;
            FixedOffset::east_opt(0)
        }
        b'+' | b'-' => {
            cursor.pos += 1;
            let hours = i32::try_from(cursor.number(2)?).ok()?;
            cursor.eat(|c| c == b':');
            let minutes = if cursor.has_digits(2) {
                i32::try_from(cursor.number(2)?).ok()?
            } else {
                0
            };
            let seconds = hours * 3600 + minutes * 60;
            if c == b'-' {
                FixedOffset::west_opt(seconds)
            } else {
                FixedOffset::east_opt(seconds)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn at(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    #[test]
    fn test_format_offsets() {
        let codec = DateTimeCodec::new();
        assert_eq!(
            codec.format(&at("2024-03-05T07:08:09.123+02:00")),
            "2024-03-05T07:08:09.123+02:00"
        );
        assert_eq!(
            codec.format(&at("2024-03-05T07:08:09-05:30")),
            "2024-03-05T07:08:09.000-05:30"
        );
        assert_eq!(
            codec.format(&at("1999-12-31T23:59:59.999Z")),
            "1999-12-31T23:59:59.999Z"
        );
    }

    #[test]
    fn test_format_utc_converts() {
        let codec = DateTimeCodec::new();
        let value = at("2024-03-05T01:00:00.250+02:00");
        assert_eq!(codec.format_utc(&value), "2024-03-04T23:00:00.250Z");
        assert_eq!(
            codec.format_utc(&value.with_timezone(&Utc)),
            "2024-03-04T23:00:00.250Z"
        );
    }

    #[test]
    fn test_format_into_length() {
        let mut buf = [0u8; MAX_DATETIME_LEN];
        let len = DateTimeCodec::new().format_into(&at("2024-03-05T07:08:09+02:00"), &mut buf);
        assert_eq!(len, MAX_DATETIME_LEN);
    }

    #[test]
    #[should_panic(expected = "four digits")]
    fn test_format_rejects_five_digit_year() {
        let value = NaiveDate::from_ymd_opt(10_000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .fixed_offset();
        let _ = DateTimeCodec::new().format(&value);
    }

    #[test]
    fn test_parse_extended_and_basic() {
        let codec = DateTimeCodec::new();
        let expected = at("2024-03-05T07:08:09.123+02:00");
        assert_eq!(codec.parse("2024-03-05T07:08:09.123+02:00"), Some(expected));
        assert_eq!(codec.parse("20240305T070809.123+0200"), Some(expected));
        assert_eq!(codec.parse("2024-03-05t07:08:09,123+02"), Some(expected));
        assert_eq!(codec.parse("2024-03-05 05:08:09.123z"), Some(expected));
    }

    #[test]
    fn test_parse_partial_time() {
        let codec = DateTimeCodec::new();
        assert_eq!(codec.parse("2024-03-05T07Z"), Some(at("2024-03-05T07:00:00Z")));
        assert_eq!(codec.parse("2024-03-05T0708Z"), Some(at("2024-03-05T07:08:00Z")));
        assert_eq!(
            codec.parse("2024-03-05T07:08:09.5Z"),
            Some(at("2024-03-05T07:08:09.500Z"))
        );
        assert_eq!(
            codec.parse("2024-03-05T07:08:09.123456Z"),
            Some(at("2024-03-05T07:08:09.123Z"))
        );
    }

    #[test]
    fn test_parse_week_dates() {
        let codec = DateTimeCodec::new();
        let monday = at("2019-12-30T00:00:00Z");
        assert_eq!(codec.parse("2020-W01-1Z"), Some(monday));
        assert_eq!(codec.parse("2020W01Z"), Some(monday));
        assert_eq!(codec.parse("2020w017T12:00Z"), Some(at("2020-01-05T12:00:00Z")));
        assert_eq!(codec.parse("2020-W01 12:00Z"), Some(at("2019-12-30T12:00:00Z")));
        assert_eq!(codec.parse("2020-W01T12:00Z"), Some(at("2019-12-30T12:00:00Z")));
        assert_eq!(codec.parse("2020-W01-3 12:00Z"), Some(at("2020-01-01T12:00:00Z")));
        assert_eq!(codec.parse("2020-W01-8Z"), None);
        assert_eq!(codec.parse("2020-W54Z"), None);
    }

    #[test]
    fn test_parse_ordinal_dates() {
        let codec = DateTimeCodec::new();
        assert_eq!(
            codec.parse("2020-060T00:00Z"),
            Some(at("2020-02-29T00:00:00Z"))
        );
        assert_eq!(codec.parse("2020060T1200Z"), Some(at("2020-02-29T12:00:00Z")));
        let local = codec.parse("2021-365").unwrap();
        assert_eq!(local.naive_local().to_string(), "2021-12-31 00:00:00");
        assert_eq!(codec.parse("2021-366"), None);
    }

    #[test]
    fn test_missing_zone_uses_local_offset() {
        let codec = DateTimeCodec::new();
        let value = codec.parse("2024-03-05T07:08:09").unwrap();
        assert_eq!(value.offset(), &local_offset());
        assert_eq!(value.naive_local().to_string(), "2024-03-05 07:08:09");
    }

    #[test]
    fn test_parse_rejects() {
        let codec = DateTimeCodec::new();
        for text in [
            "",
            "abc",
            "2024",
            "2024-13-01Z",
            "2024-02-30Z",
            "2024-01-01T25:00Z",
            "2024-01-01T10:00Zx",
            "2024-01-01T10:00+0",
            "2024-01-01T10:00:00.Z",
            "2024-01-01X",
        ] {
            assert_eq!(codec.parse(text), None, "{text}");
        }
    }

    #[test]
    fn test_roundtrip() {
        let codec = DateTimeCodec::new();
        for text in [
            "2024-03-05T07:08:09.123+02:00",
            "0001-01-01T00:00:00.000Z",
            "9999-12-31T23:59:59.999-11:45",
        ] {
            let value = codec.parse(text).unwrap();
            assert_eq!(codec.format(&value), text);
        }
    }
}
