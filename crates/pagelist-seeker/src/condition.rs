//! Condition types for filter predicates.
//!
//! A [`Condition`] is a single filter predicate: a field name, an operator,
//! and the value to compare against.

use regex::Regex;

use crate::error::Result;
use crate::op::Op;
use crate::record::PageRecord;
use crate::value::{split_tokens, Value};

/// How a token-list filter value matches a multi-value page field under
/// [`Op::Eq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    /// Every filter token must be present (AND combinator).
    All,
    /// At least one filter token must be present (OR combinator).
    Any,
}

/// A single filter predicate.
///
/// # Example
///
/// ```
/// use pagelist_seeker::{Condition, Membership, PageRecord};
///
/// let page = PageRecord::new().with("tags", "News, Finance");
///
/// assert!(Condition::eq("tags", "news").matches(&page, Membership::All));
/// assert!(!Condition::eq("tags", ["news", "sport"]).matches(&page, Membership::All));
/// assert!(Condition::eq("tags", ["news", "sport"]).matches(&page, Membership::Any));
/// ```
#[derive(Debug, Clone)]
pub struct Condition {
    /// The field name to compare.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: FilterValue,
}

impl Condition {
    /// Creates an equality-set condition. Tokens are lower-cased.
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Condition {
            field: field.into(),
            op: Op::Eq,
            value: value.into().normalized(),
        }
    }

    /// Creates a contains condition. The field name and tokens are
    /// lower-cased.
    pub fn contains(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Condition {
            field: field.into().to_lowercase(),
            op: Op::Contains,
            value: value.into().normalized(),
        }
    }

    /// Creates a regular expression condition.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn matches_pattern(field: impl Into<String>, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        Ok(Condition {
            field: field.into(),
            op: Op::Matches,
            value: FilterValue::Pattern(regex),
        })
    }

    /// Creates a prefix condition. The prefix is compared case-sensitively.
    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Condition {
            field: field.into(),
            op: Op::StartsWith,
            value: FilterValue::Text(prefix.into()),
        }
    }

    /// Creates a condition that never matches, keeping the authored value
    /// for diagnostics.
    pub fn malformed(field: impl Into<String>, op: Op, raw: impl Into<String>) -> Self {
        Condition {
            field: field.into(),
            op,
            value: FilterValue::Malformed(raw.into()),
        }
    }

    /// Evaluates this condition against a page.
    ///
    /// Returns `false` when the field is missing or the value kinds are
    /// incompatible; never panics.
    pub fn matches(&self, page: &PageRecord, membership: Membership) -> bool {
        if self.op.is_text_op() {
            return page
                .text(&self.field)
                .is_some_and(|text| self.match_text(&text));
        }
        let membership = match self.op {
            Op::Contains => Membership::Any,
            _ => membership,
        };
        match_membership(&page.value(&self.field), &self.value, membership)
    }

    fn match_text(&self, text: &str) -> bool {
        match (&self.value, self.op) {
            (FilterValue::Pattern(regex), Op::Matches) => regex.is_match(text),
            (FilterValue::Text(prefix), Op::StartsWith) => text.starts_with(prefix.as_str()),
            _ => false,
        }
    }
}

fn match_membership(page_value: &Value, expected: &FilterValue, membership: Membership) -> bool {
    match (expected, page_value) {
        // A missing field never matches
        (_, Value::None) => false,

        (FilterValue::Tokens(wanted), Value::Multi(present)) => match membership {
            Membership::All => wanted.iter().all(|t| present.contains(t)),
            Membership::Any => wanted.iter().any(|t| present.contains(t)),
        },
        // A list can only match a scalar field when any single token may match
        (FilterValue::Tokens(wanted), Value::Scalar(present)) => match membership {
            Membership::All => false,
            Membership::Any => wanted.contains(present),
        },

        (FilterValue::Token(wanted), Value::Multi(present)) => present.contains(wanted),
        (FilterValue::Token(wanted), Value::Scalar(present)) => wanted == present,

        _ => false,
    }
}

/// Owned value for storage in a condition.
#[derive(Debug, Clone)]
pub enum FilterValue {
    /// Single lower-cased token.
    Token(String),
    /// List of lower-cased tokens.
    Tokens(Vec<String>),
    /// Literal text, compared case-sensitively.
    Text(String),
    /// Compiled regular expression.
    Pattern(Regex),
    /// Authored value that could not be interpreted; never matches.
    Malformed(String),
}

impl FilterValue {
    /// Interprets authored filter text: a comma makes it a token list.
    ///
    /// ```
    /// use pagelist_seeker::FilterValue;
    ///
    /// assert!(matches!(FilterValue::parse("News"), FilterValue::Token(t) if t == "news"));
    /// assert!(matches!(FilterValue::parse("a, B"), FilterValue::Tokens(t) if t == ["a", "b"]));
    /// ```
    pub fn parse(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains(',') {
            FilterValue::Tokens(split_tokens(&lower))
        } else {
            FilterValue::Token(lower)
        }
    }

    /// Returns `true` if this is a token list.
    pub fn is_list(&self) -> bool {
        matches!(self, FilterValue::Tokens(_))
    }

    fn normalized(self) -> Self {
        match self {
            FilterValue::Token(t) => FilterValue::Token(t.to_lowercase()),
            FilterValue::Tokens(ts) => {
                FilterValue::Tokens(ts.iter().map(|t| t.trim().to_lowercase()).collect())
            }
            other => other,
        }
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Token(s)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Token(s.to_string())
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(v: Vec<String>) -> Self {
        FilterValue::Tokens(v)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(v: Vec<&str>) -> Self {
        FilterValue::Tokens(v.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FilterValue {
    fn from(v: [&str; N]) -> Self {
        FilterValue::Tokens(v.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Regex> for FilterValue {
    fn from(r: Regex) -> Self {
        FilterValue::Pattern(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(field: &str, value: &str) -> PageRecord {
        PageRecord::new().with(field, value)
    }

    #[test]
    fn scalar_equality_is_case_insensitive() {
        let cond = Condition::eq("category", "News");
        assert!(cond.matches(&page("category", "NEWS"), Membership::All));
        assert!(!cond.matches(&page("category", "sport"), Membership::All));
    }

    #[test]
    fn scalar_page_value_is_not_trimmed() {
        let cond = Condition::eq("category", "news");
        assert!(!cond.matches(&page("category", "news "), Membership::All));
    }

    #[test]
    fn scalar_filter_against_multi_value() {
        let cond = Condition::eq("tags", "b");
        assert!(cond.matches(&page("tags", "a, B ,c"), Membership::All));
        assert!(cond.matches(&page("tags", "a,b,c"), Membership::Any));
        assert!(!cond.matches(&page("tags", "a,c"), Membership::All));
    }

    #[test]
    fn list_filter_all_requires_containment() {
        let page = page("tags", "a,b,c");
        assert!(Condition::eq("tags", ["a", "c"]).matches(&page, Membership::All));
        assert!(!Condition::eq("tags", ["b", "x"]).matches(&page, Membership::All));
    }

    #[test]
    fn list_filter_any_requires_intersection() {
        let page = page("tags", "a,b,c");
        assert!(Condition::eq("tags", ["b", "x"]).matches(&page, Membership::Any));
        assert!(!Condition::eq("tags", ["x", "y"]).matches(&page, Membership::Any));
    }

    #[test]
    fn list_filter_against_scalar_value() {
        let page = page("category", "news");
        let cond = Condition::eq("category", ["news", "events"]);
        assert!(!cond.matches(&page, Membership::All));
        assert!(cond.matches(&page, Membership::Any));
    }

    #[test]
    fn list_tokens_are_normalized() {
        let cond = Condition::eq("tags", vec![" News ", "EVENTS"]);
        assert!(cond.matches(&page("tags", "news,events"), Membership::All));
    }

    #[test]
    fn contains_uses_intersection_and_lowercase_field() {
        let page = page("tags", "a,b");
        let cond = Condition::contains("TAGS", ["b", "z"]);
        assert_eq!(cond.field, "tags");
        assert!(cond.matches(&page, Membership::All));
    }

    #[test]
    fn pattern_matches_raw_text() {
        let cond = Condition::matches_pattern("path", r"^/en/blog/\d{4}/").unwrap();
        assert!(cond.matches(&page("path", "/en/blog/2024/post"), Membership::All));
        assert!(!cond.matches(&page("path", "/EN/blog/2024/post"), Membership::All));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(Condition::matches_pattern("path", "(unclosed").is_err());
    }

    #[test]
    fn prefix_is_case_sensitive() {
        let cond = Condition::starts_with("path", "/blog/");
        assert!(cond.matches(&page("path", "/blog/a"), Membership::All));
        assert!(!cond.matches(&page("path", "/Blog/a"), Membership::All));
        assert!(!cond.matches(&page("path", "/blog"), Membership::All));
    }

    #[test]
    fn missing_field_never_matches() {
        let empty = PageRecord::new();
        assert!(!Condition::eq("tags", "a").matches(&empty, Membership::All));
        assert!(!Condition::eq("tags", ["a"]).matches(&empty, Membership::Any));
        assert!(!Condition::starts_with("path", "/").matches(&empty, Membership::All));
        let pattern = Condition::matches_pattern("path", ".*").unwrap();
        assert!(!pattern.matches(&empty, Membership::Any));
    }

    #[test]
    fn malformed_never_matches() {
        let cond = Condition::malformed("path", Op::Matches, "(");
        assert!(!cond.matches(&page("path", "("), Membership::Any));
    }

    #[test]
    fn parse_filter_value() {
        assert!(!FilterValue::parse("single").is_list());
        assert!(FilterValue::parse("a,b").is_list());
    }
}
