//! Relative-time labels for feeds and comment threads.
//!
//! Two styles are in use: a compact one for admin lists (`5m ago`) and a
//! spelled-out one for citizen-facing pages (`5 minutes ago`). Both take
//! `now` explicitly and return an empty string for missing or unparseable
//! timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Formats accepted for timestamps without an offset, read as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a timestamp into UTC.
///
/// Accepts RFC 3339, ISO date-times without an offset, and bare dates
/// (midnight). Offset-less values are taken as UTC.
pub fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    let timestamp = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(timestamp, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(timestamp, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Compact label: `42m ago`, `5h ago`, `3d ago`.
///
/// Timestamps in the future count as `0m ago`.
pub fn short_label(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(then) = timestamp.and_then(parse_timestamp) else {
        return String::new();
    };
    let mins = (now - then).num_minutes().max(0);
    if mins < 60 {
        return format!("{mins}m ago");
    }
    let hrs = mins / 60;
    if hrs < 24 {
        return format!("{hrs}h ago");
    }
    format!("{}d ago", hrs / 24)
}

/// Spelled-out label: `Just now`, `1 minute ago`, `3 hours ago`, `2 days ago`.
pub fn long_label(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(then) = timestamp.and_then(parse_timestamp) else {
        return String::new();
    };
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    plural(hours / 24, "day")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn ago(d: Duration) -> String {
        (now() - d).to_rfc3339()
    }

    #[test]
    fn test_short_label_units() {
        assert_eq!(short_label(Some(&ago(Duration::seconds(30))), now()), "0m ago");
        assert_eq!(short_label(Some(&ago(Duration::minutes(59))), now()), "59m ago");
        assert_eq!(short_label(Some(&ago(Duration::minutes(60))), now()), "1h ago");
        assert_eq!(short_label(Some(&ago(Duration::hours(23))), now()), "23h ago");
        assert_eq!(short_label(Some(&ago(Duration::hours(49))), now()), "2d ago");
    }

    #[test]
    fn test_short_label_future_and_invalid() {
        let future = (now() + Duration::hours(2)).to_rfc3339();
        assert_eq!(short_label(Some(&future), now()), "0m ago");
        assert_eq!(short_label(Some("yesterday"), now()), "");
        assert_eq!(short_label(None, now()), "");
    }

    #[test]
    fn test_long_label_units() {
        assert_eq!(long_label(Some(&ago(Duration::seconds(10))), now()), "Just now");
        assert_eq!(long_label(Some(&ago(Duration::minutes(1))), now()), "1 minute ago");
        assert_eq!(long_label(Some(&ago(Duration::minutes(5))), now()), "5 minutes ago");
        assert_eq!(long_label(Some(&ago(Duration::hours(1))), now()), "1 hour ago");
        assert_eq!(long_label(Some(&ago(Duration::hours(30))), now()), "1 day ago");
        assert_eq!(long_label(Some(&ago(Duration::days(4))), now()), "4 days ago");
    }

    #[test]
    fn test_long_label_future_and_invalid() {
        let future = (now() + Duration::minutes(3)).to_rfc3339();
        assert_eq!(long_label(Some(&future), now()), "Just now");
        assert_eq!(long_label(Some(""), now()), "");
    }

    #[test]
    fn test_parse_offset_timestamp() {
        let parsed = parse_timestamp("2025-03-10T20:00:00+08:00").unwrap();
        assert_eq!(parsed, now());
    }

    #[test]
    fn test_parse_timestamp_without_offset() {
        assert_eq!(parse_timestamp("2025-03-10T12:00:00").unwrap(), now());
        assert_eq!(
            parse_timestamp("2025-03-10T12:00:00.250").unwrap(),
            now() + Duration::milliseconds(250)
        );
        assert_eq!(parse_timestamp("2025-03-10T12:00").unwrap(), now());
        assert_eq!(
            parse_timestamp("2025-03-10").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("10/03/2025").is_none());
    }

    #[test]
    fn test_labels_for_date_only_timestamp() {
        assert_eq!(short_label(Some("2025-03-10"), now()), "12h ago");
        assert_eq!(long_label(Some("2025-03-08"), now()), "2 days ago");
    }
}
