//! Parsing of the date/time text found in the exports.
//!
//! The exports mix ISO timestamps, US-style dates with 12-hour clock times,
//! and bare dates. [`parse_datetime`] tries a fixed list of formats in order
//! and never fails: text matching none of them yields the current local time,
//! tagged as [`ParsedInstant::Fallback`] so callers can count it.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::{trace, warn};

/// Canonical rendering of an instant in produced frames.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy)]
enum DateFormat {
    DateTime(&'static str),
    Date(&'static str),
}

/// Accepted formats, in priority order.
const DATE_FORMATS: [DateFormat; 5] = [
    DateFormat::DateTime("%Y-%m-%d %H:%M:%S"),
    DateFormat::DateTime("%m/%d/%Y %I:%M:%S %p"),
    DateFormat::DateTime("%m/%d/%Y %H:%M:%S"),
    DateFormat::Date("%Y-%m-%d"),
    DateFormat::Date("%m/%d/%Y"),
];

/// Time-of-day formats tried for bare time cells.
const TIME_FORMATS: [&str; 4] = ["%I:%M:%S %p", "%I:%M %p", "%H:%M:%S", "%H:%M"];

/// Outcome of parsing date text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedInstant {
    /// The text matched one of the accepted formats.
    Parsed(NaiveDateTime),
    /// Nothing matched; the value is the wall-clock time at parse.
    Fallback(NaiveDateTime),
}

impl ParsedInstant {
    pub fn instant(self) -> NaiveDateTime {
        match self {
            Self::Parsed(instant) | Self::Fallback(instant) => instant,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

impl From<NaiveDateTime> for ParsedInstant {
    fn from(instant: NaiveDateTime) -> Self {
        Self::Parsed(instant)
    }
}

fn try_formats(value: &str) -> Option<NaiveDateTime> {
    DATE_FORMATS.iter().find_map(|format| match format {
        DateFormat::DateTime(pattern) => NaiveDateTime::parse_from_str(value, pattern).ok(),
        DateFormat::Date(pattern) => NaiveDate::parse_from_str(value, pattern)
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN)),
    })
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse date/time text, falling back to the current time with a warning.
pub fn parse_datetime(value: &str) -> ParsedInstant {
    if let Some(instant) = try_formats(value.trim()) {
        return ParsedInstant::Parsed(instant);
    }
    warn!("unparseable date, using current time");
    trace!(value, "unparseable date text");
    ParsedInstant::Fallback(now())
}

/// Parse the time-of-day of a time cell.
///
/// Full timestamps are accepted as well as bare clock times; the date part
/// of the result is meaningless and only the hour/minute should be used.
pub fn parse_time_of_day(value: &str) -> ParsedInstant {
    let trimmed = value.trim();
    if let Some(instant) = try_formats(trimmed) {
        return ParsedInstant::Parsed(instant);
    }
    if let Some(time) = TIME_FORMATS
        .iter()
        .find_map(|pattern| NaiveTime::parse_from_str(trimmed, pattern).ok())
    {
        return ParsedInstant::Parsed(NaiveDate::MIN.and_time(time));
    }
    warn!("unparseable time, using current time");
    trace!(value, "unparseable time text");
    ParsedInstant::Fallback(now())
}

/// Combine the calendar day of `date` with the hour and minute of `time`.
pub fn combine_date_and_time(date: NaiveDateTime, time: NaiveDateTime) -> NaiveDateTime {
    date.date()
        .and_hms_opt(time.hour(), time.minute(), 0)
        .unwrap_or_else(|| date.date().and_time(NaiveTime::MIN))
}

pub fn format_canonical(instant: NaiveDateTime) -> String {
    instant.format(CANONICAL_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_every_supported_format() {
        assert_eq!(
            parse_datetime("2024-06-01 14:30:05"),
            ParsedInstant::Parsed(at(2024, 6, 1, 14, 30, 5))
        );
        assert_eq!(
            parse_datetime("4/11/2022 11:53:28 PM"),
            ParsedInstant::Parsed(at(2022, 4, 11, 23, 53, 28))
        );
        assert_eq!(
            parse_datetime("04/11/2022 12:05:00 AM"),
            ParsedInstant::Parsed(at(2022, 4, 11, 0, 5, 0))
        );
        assert_eq!(
            parse_datetime("4/11/2022 17:20:00"),
            ParsedInstant::Parsed(at(2022, 4, 11, 17, 20, 0))
        );
        assert_eq!(
            parse_datetime("2025-02-01"),
            ParsedInstant::Parsed(at(2025, 2, 1, 0, 0, 0))
        );
        assert_eq!(
            parse_datetime("2/1/2025"),
            ParsedInstant::Parsed(at(2025, 2, 1, 0, 0, 0))
        );
    }

    #[test]
    fn unparseable_text_falls_back_to_now() {
        let before = Local::now().naive_local();
        let parsed = parse_datetime("sometime last spring");
        let after = Local::now().naive_local();
        assert!(parsed.is_fallback());
        assert!(before <= parsed.instant() && parsed.instant() <= after);
        assert!(parse_datetime("").is_fallback());
        assert!(parse_datetime("2024-13-01").is_fallback());
    }

    #[test]
    fn structured_instants_pass_through() {
        let instant = at(2024, 1, 2, 3, 4, 5);
        assert_eq!(ParsedInstant::from(instant).instant(), instant);
        assert!(!ParsedInstant::from(instant).is_fallback());
    }

    #[test]
    fn time_cells_accept_bare_clock_times() {
        let time = parse_time_of_day("2:07 PM");
        assert!(!time.is_fallback());
        assert_eq!((time.instant().hour(), time.instant().minute()), (14, 7));
        let time = parse_time_of_day("09:15:59");
        assert_eq!((time.instant().hour(), time.instant().minute()), (9, 15));
        let time = parse_time_of_day("4/11/2022 11:53:28 PM");
        assert_eq!((time.instant().hour(), time.instant().minute()), (23, 53));
        assert!(parse_time_of_day("noon-ish").is_fallback());
    }

    #[test]
    fn combine_takes_day_from_date_and_minute_from_time() {
        let combined = combine_date_and_time(at(2024, 6, 1, 0, 0, 0), at(1999, 1, 1, 14, 30, 45));
        assert_eq!(combined, at(2024, 6, 1, 14, 30, 0));
    }
}
