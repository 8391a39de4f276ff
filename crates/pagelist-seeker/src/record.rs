//! Page records and index documents.
//!
//! A [`PageRecord`] is one row of a site's content index: a flat mapping
//! from field name to authored text. Index JSON is not strictly typed, so
//! decoding is lenient; numbers and booleans keep their JSON text and
//! arrays are kept as lists that read back comma-joined.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::value::Value;

/// Well-known index field names.
pub mod fields {
    /// Page path, e.g. `/en/blog/post`.
    pub const PATH: &str = "path";
    /// Page title.
    pub const TITLE: &str = "title";
    /// Publication date, the default sort key.
    pub const RELEASE_DATE: &str = "releaseDate";
    /// End of an event page's visibility.
    pub const OFF_DATE_TIME: &str = "offDateTime";
    /// Robots meta directive; non-empty means the page is not listed.
    pub const ROBOTS: &str = "robots";
}

/// Stored value of a single page field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Plain text, possibly a comma-separated list.
    Text(String),
    /// Native list from the index document.
    List(Vec<String>),
}

impl FieldValue {
    /// Returns the field as text. Lists are joined with commas so they
    /// behave like comma-encoded values in comparisons.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s),
            FieldValue::List(items) => Cow::Owned(items.join(",")),
        }
    }

    fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(FieldValue::Text(s)),
            serde_json::Value::Array(items) => Some(FieldValue::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        serde_json::Value::Null => None,
                        serde_json::Value::String(s) => Some(s),
                        other => Some(other.to_string()),
                    })
                    .collect(),
            )),
            other => Some(FieldValue::Text(other.to_string())),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::List(items.into_iter().map(String::from).collect())
    }
}

/// One entry of a content index.
///
/// # Example
///
/// ```
/// use pagelist_seeker::PageRecord;
///
/// let page = PageRecord::new()
///     .with("title", "Quarterly results")
///     .with("tags", "Finance, News");
///
/// assert_eq!(page.text("title").as_deref(), Some("Quarterly results"));
/// assert!(page.value("tags").is_multi());
/// assert!(page.value("author").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct PageRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl PageRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        PageRecord::default()
    }

    /// Sets a field, builder style.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field, returning the previous value.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(field.into(), value.into())
    }

    /// Returns the stored value of a field.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Returns the raw text of a field.
    pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        self.fields.get(field).map(FieldValue::as_text)
    }

    /// Returns the comparison view of a field.
    pub fn value(&self, field: &str) -> Value {
        Value::from_raw(self.text(field).as_deref())
    }

    /// Iterates over field names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterates over fields in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for PageRecord {
    fn from(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let fields = raw
            .into_iter()
            .filter_map(|(k, v)| FieldValue::from_json(v).map(|v| (k, v)))
            .collect();
        PageRecord { fields }
    }
}

impl<K, V> FromIterator<(K, V)> for PageRecord
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        PageRecord {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for PageRecord {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(PageRecord::from(raw))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IndexDocument {
    Envelope { data: Vec<PageRecord> },
    Records(Vec<PageRecord>),
}

/// Decodes an index document: either a bare array of records or the
/// `{ "total", "offset", "limit", "data" }` envelope served for
/// query-index files.
///
/// # Example
///
/// ```
/// use pagelist_seeker::parse_index;
///
/// let pages = parse_index(r#"{"total": 1, "data": [{"path": "/en/a"}]}"#).unwrap();
/// assert_eq!(pages.len(), 1);
/// ```
pub fn parse_index(json: &str) -> Result<Vec<PageRecord>> {
    let document: IndexDocument = serde_json::from_str(json)?;
    Ok(match document {
        IndexDocument::Envelope { data } => data,
        IndexDocument::Records(records) => records,
    })
}
