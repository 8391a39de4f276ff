//! Ordering types for result sorting.
//!
//! Provides [`Direction`], [`SortSpec`] and [`sort_pages`]. The sort key
//! decides the comparison: `title` compares text, `releaseDate` (or an
//! empty field name) compares parsed dates, and any other field uses a
//! natural comparison where digit runs compare by value.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use crate::date::parse_date;
use crate::record::{fields, PageRecord};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl Direction {
    /// Parses an authored direction. Only `descending` / `desc` select
    /// descending order; anything else is ascending.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "descending" | "desc" => Direction::Descending,
            _ => Direction::Ascending,
        }
    }

    /// Returns `true` if this is ascending order.
    pub fn is_ascending(self) -> bool {
        matches!(self, Direction::Ascending)
    }

    /// Returns `true` if this is descending order.
    pub fn is_descending(self) -> bool {
        matches!(self, Direction::Descending)
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ascending => "ascending",
            Direction::Descending => "descending",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Comparison used for a sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey<'a> {
    /// Plain text comparison of `title`.
    Title,
    /// Date comparison of `releaseDate`.
    ReleaseDate,
    /// Natural comparison of any other field.
    Field(&'a str),
}

/// A field to sort by, with a direction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec {
    /// The field to sort by. Empty means `releaseDate`.
    pub field: String,
    /// The sort direction.
    pub direction: Direction,
}

impl SortSpec {
    /// Creates a sort spec.
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        SortSpec {
            field: field.into(),
            direction,
        }
    }

    /// Creates an ascending sort spec.
    pub fn ascending(field: impl Into<String>) -> Self {
        SortSpec::new(field, Direction::Ascending)
    }

    /// Creates a descending sort spec.
    pub fn descending(field: impl Into<String>) -> Self {
        SortSpec::new(field, Direction::Descending)
    }

    /// Returns the comparison used for this spec's field.
    pub fn key(&self) -> SortKey<'_> {
        match self.field.as_str() {
            fields::TITLE => SortKey::Title,
            fields::RELEASE_DATE | "" => SortKey::ReleaseDate,
            other => SortKey::Field(other),
        }
    }

    /// Compares two pages according to this spec.
    pub fn compare(&self, a: &PageRecord, b: &PageRecord) -> Ordering {
        compare_pages(a, b, self)
    }
}

/// Compares two pages according to a sort spec.
///
/// Pages missing the field, or whose date does not parse, sort after all
/// others in both directions.
pub fn compare_pages(a: &PageRecord, b: &PageRecord, spec: &SortSpec) -> Ordering {
    let dir = spec.direction;
    match spec.key() {
        SortKey::Title => compare_present(
            a.text(fields::TITLE),
            b.text(fields::TITLE),
            dir,
            |x, y| x.cmp(y),
        ),
        SortKey::ReleaseDate => compare_present(
            a.text(fields::RELEASE_DATE).and_then(|s| parse_date(&s)),
            b.text(fields::RELEASE_DATE).and_then(|s| parse_date(&s)),
            dir,
            |x, y| x.cmp(y),
        ),
        SortKey::Field(field) => {
            compare_present(a.text(field), b.text(field), dir, |x, y| natural_cmp(x, y))
        }
    }
}

fn compare_present<T>(
    a: Option<T>,
    b: Option<T>,
    dir: Direction,
    cmp: impl FnOnce(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => dir.apply(cmp(&a, &b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts pages, returning them in the requested order.
///
/// The sort is stable: pages that compare equal keep their input order,
/// so sorting an already sorted sequence changes nothing.
///
/// # Example
///
/// ```
/// use pagelist_seeker::{sort_pages, PageRecord, SortSpec};
///
/// let pages = vec![
///     PageRecord::new().with("title", "B").with("releaseDate", "2024-01-01"),
///     PageRecord::new().with("title", "A").with("releaseDate", "2023-01-01"),
/// ];
///
/// let sorted = sort_pages(pages, &SortSpec::ascending("title"));
/// assert_eq!(sorted[0].text("title").as_deref(), Some("A"));
/// ```
pub fn sort_pages<P>(mut pages: Vec<P>, spec: &SortSpec) -> Vec<P>
where
    P: Borrow<PageRecord>,
{
    pages.sort_by(|a, b| compare_pages(a.borrow(), b.borrow(), spec));
    tracing::debug!(
        op = "sort_pages",
        field = %spec.field,
        direction = %spec.direction,
        count = pages.len(),
    );
    pages
}

/// Case-insensitive comparison where runs of ASCII digits compare by
/// numeric value, so `item2` sorts before `item10`.
///
/// Strings equal under that rule are ordered by their raw text.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let l = take_digits(&mut left);
                let r = take_digits(&mut right);
                let ordering = compare_digit_runs(&l, &r);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                let ordering = x.to_lowercase().cmp(y.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        run.push(c);
    }
    run
}

fn compare_digit_runs(l: &str, r: &str) -> Ordering {
    let l = l.trim_start_matches('0');
    let r = r.trim_start_matches('0');
    l.len().cmp(&r.len()).then_with(|| l.cmp(r))
}
