//! Filter specifications and the AND / OR evaluators.

use std::borrow::Borrow;

use crate::condition::{Condition, FilterValue, Membership};
use crate::error::{QueryError, Result};
use crate::record::PageRecord;

/// How an OR filter combines its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrMode {
    /// A page matches when any condition matches.
    #[default]
    Any,
    /// A page matches when the *last* condition matches.
    ///
    /// Reproduces list blocks that kept a single flag and overwrote it for
    /// every condition, so an earlier match could be undone by a later
    /// miss. Use it to find content that depends on that behavior.
    LastWins,
}

/// How the conditions of a [`FilterSpec`] are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Combinator {
    /// Every condition must match.
    #[default]
    And,
    /// At least one condition must match.
    Or(OrMode),
}

impl Combinator {
    /// Parses an authored combinator name: `and`, `or` or `legacy-or`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "and" => Some(Combinator::And),
            "or" => Some(Combinator::Or(OrMode::Any)),
            "legacy-or" | "legacy_or" => Some(Combinator::Or(OrMode::LastWins)),
            _ => None,
        }
    }

    /// Returns the display name of this combinator.
    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or(OrMode::Any) => "or",
            Combinator::Or(OrMode::LastWins) => "legacy-or",
        }
    }
}

impl std::fmt::Display for Combinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An ordered mapping of filter conditions.
///
/// Conditions keep the order they were added in, which only matters for
/// [`OrMode::LastWins`]. [`push`](FilterSpec::push) always appends, while
/// [`set`](FilterSpec::set) treats the field and operator as a key and
/// replaces an earlier condition in place.
///
/// # Example
///
/// ```
/// use pagelist_seeker::{apply_and_filter, FilterSpec, PageRecord};
///
/// let pages = vec![
///     PageRecord::new().with("category", "News").with("tags", "a,b"),
///     PageRecord::new().with("category", "Events").with("tags", "a"),
/// ];
///
/// let spec = FilterSpec::new().eq("category", "news").eq("tags", "a");
/// let found = apply_and_filter(&pages, &spec);
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    conditions: Vec<Condition>,
}

impl FilterSpec {
    /// Creates an empty spec. Under AND it matches every page.
    pub fn new() -> Self {
        FilterSpec::default()
    }

    /// Appends a condition.
    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Inserts a condition keyed by its field and operator.
    ///
    /// An existing condition with the same key keeps its position and takes
    /// the new value; otherwise the condition is appended.
    ///
    /// ```
    /// use pagelist_seeker::{Condition, FilterSpec};
    ///
    /// let mut spec = FilterSpec::new();
    /// spec.set(Condition::eq("tags", "a"));
    /// spec.set(Condition::eq("category", "news"));
    /// spec.set(Condition::eq("tags", "b"));
    ///
    /// assert_eq!(spec.len(), 2);
    /// assert_eq!(spec.conditions()[0].field, "tags");
    /// ```
    pub fn set(&mut self, condition: Condition) {
        match self
            .conditions
            .iter_mut()
            .find(|c| c.field == condition.field && c.op == condition.op)
        {
            Some(existing) => *existing = condition,
            None => self.conditions.push(condition),
        }
    }

    /// Adds a condition, builder style.
    pub fn with(mut self, condition: Condition) -> Self {
        self.push(condition);
        self
    }

    /// Adds an equality-set condition.
    pub fn eq(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.with(Condition::eq(field, value))
    }

    /// Adds a contains condition.
    pub fn contains(self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.with(Condition::contains(field, value))
    }

    /// Adds a regular expression condition.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn matches(self, field: &str, pattern: &str) -> Result<Self> {
        Ok(self.with(Condition::matches_pattern(field, pattern)?))
    }

    /// Adds a prefix condition.
    pub fn starts_with(self, field: &str, prefix: &str) -> Self {
        self.with(Condition::starts_with(field, prefix))
    }

    /// Returns the conditions in order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns `true` if there are no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Tests a page with AND semantics, stopping at the first failure.
    pub fn matches_all(&self, page: &PageRecord) -> bool {
        self.conditions
            .iter()
            .all(|c| c.matches(page, Membership::All))
    }

    /// Tests a page with OR semantics.
    ///
    /// An empty spec matches nothing here; [`apply_or_filter`] rejects it
    /// before evaluation.
    pub fn matches_any(&self, page: &PageRecord, mode: OrMode) -> bool {
        match mode {
            OrMode::Any => self
                .conditions
                .iter()
                .any(|c| c.matches(page, Membership::Any)),
            OrMode::LastWins => self
                .conditions
                .last()
                .is_some_and(|c| c.matches(page, Membership::Any)),
        }
    }

    /// Tests a page with the given combinator.
    pub fn matches_with(&self, page: &PageRecord, combinator: Combinator) -> bool {
        match combinator {
            Combinator::And => self.matches_all(page),
            Combinator::Or(mode) => self.matches_any(page, mode),
        }
    }
}

impl FromIterator<Condition> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        FilterSpec {
            conditions: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FilterSpec {
    type Item = Condition;
    type IntoIter = std::vec::IntoIter<Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.into_iter()
    }
}

/// Keeps the pages that satisfy every condition, in their original order.
///
/// Works on owned records or references alike:
///
/// ```
/// use pagelist_seeker::{apply_and_filter, FilterSpec, PageRecord};
///
/// let pages = vec![PageRecord::new().with("tags", "a,b,c")];
/// assert_eq!(apply_and_filter(&pages, &FilterSpec::new().eq("tags", "b")).len(), 1);
/// assert!(apply_and_filter(pages, &FilterSpec::new().eq("tags", ["b", "x"])).is_empty());
/// ```
pub fn apply_and_filter<P, I>(pages: I, spec: &FilterSpec) -> Vec<P>
where
    I: IntoIterator<Item = P>,
    P: Borrow<PageRecord>,
{
    let mut input = 0usize;
    let matched: Vec<P> = pages
        .into_iter()
        .inspect(|_| input += 1)
        .filter(|page| spec.matches_all(page.borrow()))
        .collect();

    tracing::debug!(
        op = "apply_and_filter",
        conditions = spec.len(),
        input,
        matched = matched.len(),
    );
    matched
}

/// Keeps the pages that satisfy the OR filter, in their original order.
///
/// Returns [`QueryError::EmptyOrFilter`] when the spec has no conditions.
pub fn apply_or_filter<P, I>(pages: I, spec: &FilterSpec, mode: OrMode) -> Result<Vec<P>>
where
    I: IntoIterator<Item = P>,
    P: Borrow<PageRecord>,
{
    if spec.is_empty() {
        return Err(QueryError::EmptyOrFilter);
    }

    let mut input = 0usize;
    let matched: Vec<P> = pages
        .into_iter()
        .inspect(|_| input += 1)
        .filter(|page| spec.matches_any(page.borrow(), mode))
        .collect();

    tracing::debug!(
        op = "apply_or_filter",
        mode = ?mode,
        conditions = spec.len(),
        input,
        matched = matched.len(),
    );
    Ok(matched)
}

/// Applies a spec with the given combinator.
pub fn apply_filter<P, I>(pages: I, spec: &FilterSpec, combinator: Combinator) -> Result<Vec<P>>
where
    I: IntoIterator<Item = P>,
    P: Borrow<PageRecord>,
{
    match combinator {
        Combinator::And => Ok(apply_and_filter(pages, spec)),
        Combinator::Or(mode) => apply_or_filter(pages, spec, mode),
    }
}
