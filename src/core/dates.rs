//! Date rendering for source timestamps
//!
//! Sources disagree on timestamp formats: TestRail reports Unix epoch
//! seconds, the Jira API reports ISO-8601 with a `+0000` style offset and
//! Jira CSV exports use `15/Jan/24 10:20 AM`. Everything is rendered as a
//! calendar date in the local time zone.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Output format for all rendered dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render Unix epoch seconds as a local `YYYY-MM-DD` date
///
/// Zero, negative or out-of-range timestamps render as an empty string
/// rather than an epoch date.
pub fn epoch_to_date(secs: i64) -> String {
    if secs <= 0 {
        return String::new();
    }
    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format(DATE_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Normalize a free-form timestamp to `YYYY-MM-DD`
///
/// Recognizes epoch seconds, RFC 3339, Jira API timestamps and the Jira CSV
/// export format. Unrecognized input is returned trimmed but otherwise
/// unchanged so no information is lost.
pub fn normalize_date(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }

    if let Ok(secs) = s.parse::<i64>() {
        return epoch_to_date(secs);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Local).format(DATE_FORMAT).to_string();
    }

    // Jira REST API: 2024-01-15T10:20:30.000+0000
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return dt.with_timezone(&Local).format(DATE_FORMAT).to_string();
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return date.format(DATE_FORMAT).to_string();
    }

    for fmt in ["%d/%b/%y %I:%M %p", "%d/%b/%Y %I:%M %p", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return naive.date().format(DATE_FORMAT).to_string();
        }
    }

    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_epoch_is_empty() {
        assert_eq!(epoch_to_date(0), "");
        assert_eq!(epoch_to_date(-5), "");
    }

    #[test]
    fn test_epoch_renders_local_date() {
        let secs = 1_700_000_000;
        let expected = Local
            .timestamp_opt(secs, 0)
            .single()
            .map(|dt| dt.format(DATE_FORMAT).to_string())
            .unwrap();
        assert_eq!(epoch_to_date(secs), expected);
        assert_eq!(normalize_date("1700000000"), expected);
    }

    #[test]
    fn test_normalize_plain_and_csv_dates() {
        assert_eq!(normalize_date("2024-03-09"), "2024-03-09");
        assert_eq!(normalize_date("15/Jan/24 10:20 AM"), "2024-01-15");
        assert_eq!(normalize_date("2024-01-15 10:20"), "2024-01-15");
    }

    #[test]
    fn test_normalize_api_timestamp_has_date_shape() {
        let rendered = normalize_date("2024-06-15T12:00:00.000+0000");
        assert!(NaiveDate::parse_from_str(&rendered, DATE_FORMAT).is_ok());
    }

    #[test]
    fn test_unrecognized_kept_verbatim() {
        assert_eq!(normalize_date("  last tuesday "), "last tuesday");
        assert_eq!(normalize_date(""), "");
    }
}
