//! `createTime` parsing.
//!
//! Game exports use local wall-clock strings such as `"2024-01-15 08:30:00"`;
//! hand-edited databases sometimes carry RFC 3339 values instead. Both are
//! reduced to a [`NaiveDateTime`] so they order as dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

const FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a `createTime` string, returning `None` when no known shape matches.
///
/// Values with an explicit offset are converted to UTC before the offset is
/// dropped.
///
/// # Examples
///
/// ```
/// use summon_core::timestamp::parse_create_time;
///
/// assert!(parse_create_time("2024-01-15 08:30:00").is_some());
/// assert!(parse_create_time("2024-01-15T08:30:00Z").is_some());
/// assert!(parse_create_time("2024-01-15").is_some());
/// assert!(parse_create_time("yesterday").is_none());
/// ```
pub fn parse_create_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    debug!("could not parse createTime \"{}\"", s);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_space_separated() {
        let dt = parse_create_time("2024-01-15 08:30:45").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 8);
        assert_eq!(dt.second(), 45);
    }

    #[test]
    fn test_parse_iso_without_offset() {
        let dt = parse_create_time("2024-01-01T00:00:00").unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.day(), 1);
    }

    #[test]
    fn test_parse_rfc3339_converts_to_utc() {
        let dt = parse_create_time("2024-01-15T10:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        assert!(parse_create_time("2024-01-15 08:30:45.123").is_some());
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_create_time("2024-02-29").unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.month(), 2);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_create_time("").is_none());
        assert!(parse_create_time("   ").is_none());
        assert!(parse_create_time("not a date").is_none());
        assert!(parse_create_time("2024-13-45 00:00:00").is_none());
    }

    #[test]
    fn test_ordering_matches_chronology() {
        let a = parse_create_time("2024-01-15 09:00:00").unwrap();
        let b = parse_create_time("2024-01-15T10:00:00").unwrap();
        assert!(a < b);
    }
}
