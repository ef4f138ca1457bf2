//! Timestamp parsing for activity entries.
//!
//! Activity exports render times like "12 Jan 2024, 14:35:22 GMT+05:30".
//! The offset is kept as-is; nothing is converted to UTC or local time.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use regex::Regex;
use std::sync::OnceLock;

fn activity_timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^\s*(?P<day>\d{1,2})\s+(?P<month>[A-Za-z]+)\.?\s+(?P<year>\d{4}),?\s+",
            r"(?P<hour>\d{1,2}):(?P<minute>\d{2})(?::(?P<second>\d{2}))?\s*",
            r"(?:GMT|UTC)(?P<sign>[+-])(?P<off_h>\d{2}):?(?P<off_m>\d{2})\s*$"
        ))
        .expect("invalid activity timestamp regex")
    })
}

fn month_from_name(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn parse_activity_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let caps = activity_timestamp_re().captures(s)?;

    let day: u32 = caps["day"].parse().ok()?;
    let month = month_from_name(&caps["month"])?;
    let year: i32 = caps["year"].parse().ok()?;
    let hour: u32 = caps["hour"].parse().ok()?;
    let minute: u32 = caps["minute"].parse().ok()?;
    let second: u32 = match caps.name("second") {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    let off_h: i32 = caps["off_h"].parse().ok()?;
    let off_m: i32 = caps["off_m"].parse().ok()?;
    let mut offset_secs = off_h * 3600 + off_m * 60;
    if &caps["sign"] == "-" {
        offset_secs = -offset_secs;
    }

    let offset = FixedOffset::east_opt(offset_secs)?;
    let local = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    offset.from_local_datetime(&local).single()
}

/// Parse an entry timestamp, keeping its UTC offset.
///
/// Accepts the activity-export form first, then RFC 3339 and
/// `YYYY-MM-DD HH:MM:SS+HH:MM` for tables produced by other tools.
/// Anything else is `None`.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    parse_activity_timestamp(s)
        .or_else(|| DateTime::parse_from_rfc3339(s).ok())
        .or_else(|| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_activity_form() {
        let ts = parse_timestamp("12 Jan 2024, 14:35:22 GMT+05:30").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 1, 12));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (14, 35, 22));
        assert_eq!(ts.offset().local_minus_utc(), 19800);
    }

    #[test]
    fn test_parse_long_month_and_no_seconds() {
        let ts = parse_timestamp("1 September 2023, 09:05 GMT-04:00").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2023, 9, 1));
        assert_eq!(ts.second(), 0);
        assert_eq!(ts.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_local_date_is_not_relocalized() {
        // 00:30 at +05:30 is the previous day in UTC; the calendar date stays local.
        let ts = parse_timestamp("1 Mar 2024, 00:30:00 GMT+05:30").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_fallback() {
        let ts = parse_timestamp("2024-02-10T08:00:00+05:30").unwrap();
        assert_eq!(ts.month(), 2);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("31 Foo 2024, 10:00 GMT+05:30").is_none());
        assert!(parse_timestamp("31 Feb 2024, 10:00 GMT+05:30").is_none());
        assert!(parse_timestamp("12 Jan 2024").is_none());
    }
}
