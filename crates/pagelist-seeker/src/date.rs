//! Lenient date parsing for index fields such as `releaseDate` and
//! `offDateTime`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::value::Timestamp;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parses authored date text into a [`Timestamp`].
///
/// Accepts RFC 3339, RFC 2822, ISO date-times without an offset, plain ISO
/// dates and US `MM/DD/YYYY` dates. Values without an offset are read as
/// UTC. Returns `None` for empty or unrecognised text.
///
/// # Example
///
/// ```
/// use pagelist_seeker::{parse_date, Timestamp};
///
/// assert_eq!(parse_date("1970-01-02"), Some(Timestamp(86_400_000)));
/// assert_eq!(parse_date("next tuesday"), None);
/// ```
pub fn parse_date(raw: &str) -> Option<Timestamp> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Timestamp::from(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(Timestamp::from(dt));
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Timestamp::from(Utc.from_utc_datetime(&naive)));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return Some(Timestamp::from(Utc.from_utc_datetime(&midnight)));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;

    #[test]
    fn plain_date_is_utc_midnight() {
        assert_eq!(parse_date("1970-01-01"), Some(Timestamp(0)));
        assert_eq!(parse_date("1970-01-03"), Some(Timestamp(2 * DAY)));
    }

    #[test]
    fn rfc3339_with_offset() {
        assert_eq!(
            parse_date("1970-01-01T01:00:00+01:00"),
            Some(Timestamp(0))
        );
        assert_eq!(parse_date("1970-01-01T00:00:01Z"), Some(Timestamp(1000)));
    }

    #[test]
    fn naive_date_time() {
        assert_eq!(parse_date("1970-01-01T00:01:00"), Some(Timestamp(60_000)));
        assert_eq!(parse_date("1970-01-01 00:01"), Some(Timestamp(60_000)));
    }

    #[test]
    fn us_date() {
        assert_eq!(parse_date("01/02/1970"), Some(Timestamp(DAY)));
    }

    #[test]
    fn rfc2822() {
        assert_eq!(
            parse_date("Thu, 01 Jan 1970 00:00:10 +0000"),
            Some(Timestamp(10_000))
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse_date("  1970-01-01 "), Some(Timestamp(0)));
    }

    #[test]
    fn garbage_and_empty() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }
}
