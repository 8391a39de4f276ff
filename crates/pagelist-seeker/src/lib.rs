//! Seeker - filter and sort engine for CMS page-index collections.
//!
//! A site's content index is a list of flat page records (`path`, `title`,
//! `tags`, `releaseDate`, ...). List blocks turn authored filter rows into
//! a query against that index. This crate evaluates those queries:
//!
//! - Equality-set filters over comma-separated multi-value fields
//! - AND and OR combinators, including the legacy "last condition wins" OR
//! - Pattern and prefix conditions
//! - Folder, robots and expired-event filters
//! - Title, date and natural-order sorting with pagination
//!
//! # Quick Start
//!
//! ```rust
//! use pagelist_seeker::{parse_index, Direction, ListQuery};
//!
//! let pages = parse_index(r#"{"data": [
//!     {"path": "/en/news/launch", "title": "Launch", "tags": "Press, Product", "releaseDate": "2024-05-01"},
//!     {"path": "/en/news/hiring", "title": "Hiring", "tags": "Careers", "releaseDate": "2024-06-01"},
//!     {"path": "/en/news/recap", "title": "Recap", "tags": "Press", "releaseDate": "2024-07-01"}
//! ]}"#).unwrap();
//!
//! let query = ListQuery::new()
//!     .folder("/en/news/")
//!     .where_eq("tags", "press")
//!     .sort_by("releaseDate", Direction::Descending)
//!     .build();
//!
//! let results = query.run(&pages).unwrap();
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].text("title").as_deref(), Some("Recap"));
//! ```
//!
//! # Filter Semantics
//!
//! Page values are lower-cased; a value containing a comma is a token list
//! (split, trimmed). Filter tokens are lower-cased when the condition is
//! built.
//!
//! | Filter value | Page value | AND | OR |
//! |--------------|------------|-----|----|
//! | token | scalar | equal | equal |
//! | token | list | token in list | token in list |
//! | tokens | list | all tokens in list | any token in list |
//! | tokens | scalar | never | scalar in tokens |
//! | any | missing | never | never |
//!
//! An empty AND spec matches every page. An empty OR spec is rejected with
//! [`QueryError::EmptyOrFilter`].
//!
//! # Sorting
//!
//! | Field | Comparison |
//! |-------|------------|
//! | `title` | text, code point order |
//! | `releaseDate` or empty | parsed dates |
//! | anything else | natural order, case-insensitive, `item2 < item10` |
//!
//! Missing fields and unparsable dates sort last in both directions.

mod condition;
mod date;
mod error;
mod filter;
mod op;
mod ordering;
mod pages;
mod query;
mod record;
mod value;

// Re-export public API
pub use condition::{Condition, FilterValue, Membership};
pub use date::parse_date;
pub use error::{QueryError, Result};
pub use filter::{apply_and_filter, apply_filter, apply_or_filter, Combinator, FilterSpec, OrMode};
pub use op::Op;
pub use ordering::{compare_pages, natural_cmp, sort_pages, Direction, SortKey, SortSpec};
pub use pages::{
    filter_out_no_index_pages, filter_out_past_events, filter_out_past_events_at,
    page_filter_by_folder,
};
pub use query::ListQuery;
pub use record::{fields, parse_index, FieldValue, PageRecord};
pub use value::{split_tokens, Timestamp, Value};
