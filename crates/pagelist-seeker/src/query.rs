//! List query builder and executor.
//!
//! [`ListQuery`] chains the individual page filters the way a list block
//! applies them:
//!
//! ```text
//! folder prefix -> filter spec (AND / OR) -> drop no-index pages
//!               -> drop past events -> sort -> offset -> limit
//! ```

use crate::condition::{Condition, FilterValue};
use crate::error::Result;
use crate::filter::{apply_filter, Combinator, FilterSpec, OrMode};
use crate::ordering::{sort_pages, Direction, SortSpec};
use crate::pages::{filter_out_no_index_pages, filter_out_past_events_at, page_filter_by_folder};
use crate::record::PageRecord;
use crate::value::Timestamp;

/// A complete listing query.
///
/// # Example
///
/// ```
/// use pagelist_seeker::{ListQuery, PageRecord, Direction};
///
/// let pages = vec![
///     PageRecord::new().with("path", "/en/news/b").with("title", "B").with("tags", "press"),
///     PageRecord::new().with("path", "/en/news/a").with("title", "A").with("tags", "press, web"),
///     PageRecord::new().with("path", "/en/about").with("title", "About").with("tags", "press"),
///     PageRecord::new().with("path", "/en/news/c").with("title", "C").with("robots", "noindex"),
/// ];
///
/// let query = ListQuery::new()
///     .folder("/en/news/")
///     .where_eq("tags", "press")
///     .sort_by("title", Direction::Ascending)
///     .limit(10)
///     .build();
///
/// let results = query.run(&pages).unwrap();
/// let titles: Vec<_> = results.iter().map(|p| p.text("title").unwrap()).collect();
/// assert_eq!(titles, ["A", "B"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    folder: Option<String>,
    filter: FilterSpec,
    combinator: Combinator,
    include_noindex: bool,
    include_past_events: bool,
    sort: Option<SortSpec>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl ListQuery {
    /// Creates a new query. With no stages configured it only drops
    /// no-index pages and expired events.
    pub fn new() -> Self {
        ListQuery::default()
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// Restricts results to pages under a folder path.
    pub fn folder(mut self, path: impl Into<String>) -> Self {
        self.folder = Some(path.into());
        self
    }

    /// Replaces the filter spec.
    pub fn filter(mut self, spec: FilterSpec) -> Self {
        self.filter = spec;
        self
    }

    /// Sets how filter conditions are combined.
    pub fn combinator(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;
        self
    }

    /// Combines filter conditions with OR.
    pub fn any_of(self, mode: OrMode) -> Self {
        self.combinator(Combinator::Or(mode))
    }

    /// Adds an equality-set condition.
    pub fn where_eq(mut self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter.push(Condition::eq(field, value));
        self
    }

    /// Adds a contains condition.
    pub fn where_contains(mut self, field: &str, value: impl Into<FilterValue>) -> Self {
        self.filter.push(Condition::contains(field, value));
        self
    }

    /// Adds a regular expression condition.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn where_matches(mut self, field: &str, pattern: &str) -> Result<Self> {
        self.filter.push(Condition::matches_pattern(field, pattern)?);
        Ok(self)
    }

    /// Adds a prefix condition.
    pub fn where_starts_with(mut self, field: &str, prefix: &str) -> Self {
        self.filter.push(Condition::starts_with(field, prefix));
        self
    }

    /// Keeps pages whose `robots` field is set.
    pub fn include_noindex(mut self, include: bool) -> Self {
        self.include_noindex = include;
        self
    }

    /// Keeps pages whose `offDateTime` has passed.
    pub fn include_past_events(mut self, include: bool) -> Self {
        self.include_past_events = include;
        self
    }

    // ========================================================================
    // Ordering and limits
    // ========================================================================

    /// Sets the sort field and direction.
    pub fn sort_by(mut self, field: &str, direction: Direction) -> Self {
        self.sort = Some(SortSpec::new(field, direction));
        self
    }

    /// Sets the sort spec.
    pub fn sort(mut self, spec: SortSpec) -> Self {
        self.sort = Some(spec);
        self
    }

    /// Sets the maximum number of results to return.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the number of results to skip.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    /// Finalizes the query.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the folder restriction, if set.
    pub fn get_folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    /// Returns the filter spec.
    pub fn get_filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Returns the combinator.
    pub fn get_combinator(&self) -> Combinator {
        self.combinator
    }

    /// Returns the sort spec, if set.
    pub fn get_sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Returns the limit, if set.
    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the offset, if set.
    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }

    /// Returns whether no-index pages are kept.
    pub fn includes_noindex(&self) -> bool {
        self.include_noindex
    }

    /// Returns whether expired events are kept.
    pub fn includes_past_events(&self) -> bool {
        self.include_past_events
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Runs the query against the current time.
    pub fn run<'a>(&self, pages: &'a [PageRecord]) -> Result<Vec<&'a PageRecord>> {
        self.run_at(pages, Timestamp::now())
    }

    /// Runs the query, treating `now` as the current time for event
    /// expiry.
    pub fn run_at<'a>(&self, pages: &'a [PageRecord], now: Timestamp) -> Result<Vec<&'a PageRecord>> {
        let mut results: Vec<&'a PageRecord> = match &self.folder {
            Some(folder) => page_filter_by_folder(pages, folder),
            None => pages.iter().collect(),
        };

        if !self.filter.is_empty() || self.combinator != Combinator::And {
            results = apply_filter(results, &self.filter, self.combinator)?;
        }
        if !self.include_noindex {
            results = filter_out_no_index_pages(results);
        }
        if !self.include_past_events {
            results = filter_out_past_events_at(results, now);
        }
        if let Some(spec) = &self.sort {
            results = sort_pages(results, spec);
        }

        // Apply offset
        let offset = self.offset.unwrap_or(0);
        if offset > 0 {
            if offset >= results.len() {
                results.clear();
            } else {
                results = results.split_off(offset);
            }
        }

        // Apply limit
        if let Some(limit) = self.limit {
            results.truncate(limit);
        }

        tracing::debug!(
            op = "list_query",
            input = pages.len(),
            returned = results.len(),
            combinator = %self.combinator,
        );
        Ok(results)
    }

    /// Runs the query and clones the matching records.
    pub fn run_cloned(&self, pages: &[PageRecord]) -> Result<Vec<PageRecord>> {
        Ok(self.run(pages)?.into_iter().cloned().collect())
    }

    /// Counts matching records, ignoring offset and limit.
    pub fn count(&self, pages: &[PageRecord]) -> Result<usize> {
        let unbounded = ListQuery {
            limit: None,
            offset: None,
            sort: None,
            ..self.clone()
        };
        Ok(unbounded.run(pages)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    fn page(path: &str, title: &str) -> PageRecord {
        PageRecord::new().with("path", path).with("title", title)
    }

    fn fixture() -> Vec<PageRecord> {
        vec![
            page("/en/news/c", "C")
                .with("tags", "press")
                .with("releaseDate", "2024-03-01"),
            page("/en/news/a", "A")
                .with("tags", "press, web")
                .with("releaseDate", "2024-01-01"),
            page("/en/news/b", "B")
                .with("tags", "web")
                .with("releaseDate", "2024-02-01"),
            page("/en/news/hidden", "Hidden").with("robots", "noindex"),
            page("/en/events/old", "Old event").with("offDateTime", "2001-01-01"),
            page("/fr/news/x", "X").with("tags", "press"),
        ]
    }

    fn titles(pages: &[&PageRecord]) -> Vec<String> {
        pages
            .iter()
            .map(|p| p.text("title").unwrap_or_default().into_owned())
            .collect()
    }

    #[test]
    fn empty_query_drops_noindex_and_expired() {
        let pages = fixture();
        let results = ListQuery::new().run(&pages).unwrap();
        assert_eq!(titles(&results), vec!["C", "A", "B", "X"]);
    }

    #[test]
    fn include_flags_keep_everything() {
        let pages = fixture();
        let results = ListQuery::new()
            .include_noindex(true)
            .include_past_events(true)
            .run(&pages)
            .unwrap();
        assert_eq!(results.len(), pages.len());
    }

    #[test]
    fn folder_then_filter_then_sort() {
        let pages = fixture();
        let results = ListQuery::new()
            .folder("/en/news/")
            .where_eq("tags", "press")
            .sort_by("releaseDate", Direction::Descending)
            .run(&pages)
            .unwrap();
        assert_eq!(titles(&results), vec!["C", "A"]);
    }

    #[test]
    fn or_combinator() {
        let pages = fixture();
        let results = ListQuery::new()
            .folder("/en/")
            .where_eq("tags", "web")
            .where_eq("title", "c")
            .any_of(OrMode::Any)
            .sort_by("title", Direction::Ascending)
            .run(&pages)
            .unwrap();
        assert_eq!(titles(&results), vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_or_query_is_an_error() {
        let pages = fixture();
        let result = ListQuery::new().any_of(OrMode::Any).run(&pages);
        assert!(matches!(result, Err(QueryError::EmptyOrFilter)));
    }

    #[test]
    fn offset_and_limit() {
        let pages = fixture();
        let query = ListQuery::new().sort_by("title", Direction::Ascending);

        let page_two = query.clone().offset(1).limit(2).run(&pages).unwrap();
        assert_eq!(titles(&page_two), vec!["B", "C"]);

        let past_end = query.offset(10).run(&pages).unwrap();
        assert!(past_end.is_empty());
    }

    #[test]
    fn count_ignores_limit() {
        let pages = fixture();
        let query = ListQuery::new().where_eq("tags", "press").limit(1);
        assert_eq!(query.count(&pages).unwrap(), 3);
        assert_eq!(query.run(&pages).unwrap().len(), 1);
    }

    #[test]
    fn run_at_uses_given_clock() {
        let pages = fixture();
        let before = Timestamp::from_secs(0);
        let results = ListQuery::new().folder("/en/events/").run_at(&pages, before).unwrap();
        assert_eq!(titles(&results), vec!["Old event"]);
    }

    #[test]
    fn where_matches_and_prefix() {
        let pages = fixture();
        let results = ListQuery::new()
            .where_matches("path", r"/news/[ab]$")
            .unwrap()
            .where_starts_with("path", "/en/")
            .run(&pages)
            .unwrap();
        assert_eq!(titles(&results), vec!["A", "B"]);

        assert!(ListQuery::new().where_matches("path", "[").is_err());
    }

    #[test]
    fn run_cloned_returns_owned() {
        let pages = fixture();
        let owned = ListQuery::new().folder("/fr/").run_cloned(&pages).unwrap();
        assert_eq!(owned, vec![pages[5].clone()]);
    }

    #[test]
    fn introspection() {
        let query = ListQuery::new()
            .folder("/x/")
            .where_contains("Tags", "a")
            .combinator(Combinator::Or(OrMode::LastWins))
            .sort(SortSpec::descending("title"))
            .limit(3)
            .offset(1)
            .build();
        assert_eq!(query.get_folder(), Some("/x/"));
        assert_eq!(query.get_filter().len(), 1);
        assert_eq!(query.get_filter().conditions()[0].field, "tags");
        assert_eq!(query.get_combinator(), Combinator::Or(OrMode::LastWins));
        assert_eq!(query.get_sort(), Some(&SortSpec::descending("title")));
        assert_eq!(query.get_limit(), Some(3));
        assert_eq!(query.get_offset(), Some(1));
        assert!(!query.includes_noindex());
        assert!(!query.includes_past_events());
    }
}
