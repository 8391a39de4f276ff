//! Comparison forms of page fields and instants.
//!
//! A page field is stored as authored text. Before any equality or
//! membership test it is read into a [`Value`]: lower-cased, and split into
//! tokens when the text contains a comma.

use chrono::{DateTime, Utc};

/// Comparison view of a page field.
///
/// # Example
///
/// ```
/// use pagelist_seeker::Value;
///
/// assert_eq!(Value::from_raw(Some("News")), Value::Scalar("news".into()));
/// assert_eq!(
///     Value::from_raw(Some("Blog, News")),
///     Value::Multi(vec!["blog".into(), "news".into()])
/// );
/// assert_eq!(Value::from_raw(None), Value::None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Single lower-cased value. Not trimmed.
    Scalar(String),
    /// Comma-separated value, split into trimmed lower-cased tokens.
    Multi(Vec<String>),
    /// Field not present on the page.
    None,
}

impl Value {
    /// Reads raw field text into its comparison form.
    ///
    /// Multi-value detection is purely syntactic: any comma makes the
    /// value a token list, even a trailing one.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => Value::None,
            Some(text) => {
                let lower = text.to_lowercase();
                if lower.contains(',') {
                    Value::Multi(split_tokens(&lower))
                } else {
                    Value::Scalar(lower)
                }
            }
        }
    }

    /// Returns `true` if the field was absent.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns `true` if this is a multi-value field.
    pub fn is_multi(&self) -> bool {
        matches!(self, Value::Multi(_))
    }

    /// Extracts the scalar value, if this is one.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the token list, if this is a multi-value field.
    pub fn as_tokens(&self) -> Option<&[String]> {
        match self {
            Value::Multi(tokens) => Some(tokens),
            _ => None,
        }
    }
}

/// Splits comma-separated text into trimmed, lower-cased tokens.
///
/// Empty tokens are kept, so `"a,,b"` yields three tokens.
pub fn split_tokens(text: &str) -> Vec<String> {
    text.split(',').map(|t| t.trim().to_lowercase()).collect()
}

/// An instant in UTC, in milliseconds. Used as "now" for event expiry and
/// as the parsed form of date fields.
///
/// # Example
///
/// ```
/// use pagelist_seeker::Timestamp;
///
/// assert!(Timestamp(1000) < Timestamp(2000));
/// assert_eq!(Timestamp::from_secs(2).as_millis(), 2000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Whole seconds since the Unix epoch. Out-of-range values clamp to
    /// the representable bounds.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    /// The current moment.
    pub fn now() -> Self {
        Timestamp::from(Utc::now())
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Truncates to whole seconds.
    pub fn as_secs(self) -> i64 {
        self.0 / 1000
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

impl<Tz: chrono::TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Timestamp(dt.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_is_lowercased_not_trimmed() {
        assert_eq!(
            Value::from_raw(Some(" Press Release")),
            Value::Scalar(" press release".to_string())
        );
    }

    #[test]
    fn comma_makes_multi() {
        let value = Value::from_raw(Some("Alpha, BETA ,gamma"));
        assert!(value.is_multi());
        assert_eq!(
            value.as_tokens(),
            Some(&["alpha".to_string(), "beta".to_string(), "gamma".to_string()][..])
        );
        assert_eq!(value.as_scalar(), None);
    }

    #[test]
    fn trailing_comma_is_still_multi() {
        assert_eq!(
            Value::from_raw(Some("news,")),
            Value::Multi(vec!["news".to_string(), String::new()])
        );
    }

    #[test]
    fn missing_field() {
        assert!(Value::from_raw(None).is_none());
        assert_eq!(Value::from_raw(None).as_scalar(), None);
    }

    #[test]
    fn timestamp_ordering() {
        assert!(Timestamp(1000) < Timestamp(2000));
        assert_eq!(Timestamp::from_millis(5000).as_secs(), 5);
    }

    #[test]
    fn timestamp_from_secs_saturates() {
        assert_eq!(Timestamp::from_secs(i64::MAX), Timestamp(i64::MAX));
        assert_eq!(Timestamp::from_secs(i64::MIN), Timestamp(i64::MIN));
        assert_eq!(Timestamp::from_secs(-3).as_millis(), -3000);
    }

    #[test]
    fn timestamp_from_datetime() {
        let dt = DateTime::parse_from_rfc3339("1970-01-01T00:00:01Z").unwrap();
        assert_eq!(Timestamp::from(dt), Timestamp(1000));
    }
}
