//! Builds a [`ListQuery`] from an authored list block.
//!
//! A list block starts with an options row and follows it with one row per
//! filter:
//!
//! ```text
//! | options  | folder=/en/blog/, filter=or, sortBy=releaseDate, sortOrder=desc, limit=6 |
//! | tags     | Rust, Web                                                             |
//! | category | Tutorial                                                              |
//! ```
//!
//! | Option | Meaning |
//! |--------|---------|
//! | `folder` | path prefix |
//! | `filter` | `and` (default), `or`, `legacy-or` |
//! | `sortBy` | field to sort on; empty sorts by date |
//! | `sortOrder` | `asc` (default) or `desc` |
//! | `limit`, `offset` | pagination |
//! | `pastEvents=show` | keep expired events |
//! | `noindex=show` | keep pages with a robots directive |

use pagelist_seeker::{Combinator, Direction, ListQuery, SortSpec};

use crate::options::{get_list_filter_options, parse_block_options, BlockOptions};
use crate::row::Block;

/// Option keys understood by [`list_query_from_block`].
pub mod keys {
    pub const FOLDER: &str = "folder";
    pub const FILTER: &str = "filter";
    pub const SORT_BY: &str = "sortBy";
    pub const SORT_ORDER: &str = "sortOrder";
    pub const LIMIT: &str = "limit";
    pub const OFFSET: &str = "offset";
    pub const PAST_EVENTS: &str = "pastEvents";
    pub const NOINDEX: &str = "noindex";
}

/// Reads the block's options row and filter rows into a query, consuming
/// the block.
///
/// Filter row keys are normalized against `property_names`, normally the
/// column names of the index. Authoring mistakes never fail: an unknown
/// combinator or an unparsable number is logged and ignored, and an OR
/// filter without filter rows falls back to AND.
///
/// ```
/// use pagelist_content::{list_query_from_block, Block, Row};
/// use pagelist_seeker::{Combinator, OrMode};
///
/// let mut block = Block::new()
///     .with(Row::with_text("options", "folder=/en/blog/, filter=or, limit=3"))
///     .with(Row::with_text("Tags", "rust"))
///     .with(Row::with_text("category", "news"));
///
/// let query = list_query_from_block(&mut block, &["tags", "category"]);
/// assert_eq!(query.get_folder(), Some("/en/blog/"));
/// assert_eq!(query.get_combinator(), Combinator::Or(OrMode::Any));
/// assert_eq!(query.get_filter().len(), 2);
/// assert_eq!(query.get_limit(), Some(3));
/// assert!(block.is_empty());
/// ```
pub fn list_query_from_block<S: AsRef<str>>(
    block: &mut Block,
    property_names: &[S],
) -> ListQuery {
    let options = parse_block_options(block, None);
    let filter = get_list_filter_options(block, property_names);

    let mut query = ListQuery::new();

    if let Some(folder) = options.value(keys::FOLDER).filter(|f| !f.is_empty()) {
        query = query.folder(folder);
    }

    let mut combinator = match options.value(keys::FILTER) {
        Some(name) => Combinator::parse(name).unwrap_or_else(|| {
            tracing::warn!(
                op = "list_query_from_block",
                filter = name,
                "unknown filter combinator, using and",
            );
            Combinator::And
        }),
        None => Combinator::And,
    };
    if combinator != Combinator::And && filter.is_empty() {
        tracing::warn!(
            op = "list_query_from_block",
            combinator = %combinator,
            "no filter rows for an or filter, using and",
        );
        combinator = Combinator::And;
    }
    query = query.filter(filter).combinator(combinator);

    if let Some(sort) = sort_spec(&options) {
        query = query.sort(sort);
    }
    if let Some(limit) = number(&options, keys::LIMIT) {
        query = query.limit(limit);
    }
    if let Some(offset) = number(&options, keys::OFFSET) {
        query = query.offset(offset);
    }

    query = query
        .include_past_events(shows(&options, keys::PAST_EVENTS))
        .include_noindex(shows(&options, keys::NOINDEX));

    tracing::debug!(
        op = "list_query_from_block",
        options = options.len(),
        conditions = query.get_filter().len(),
        combinator = %query.get_combinator(),
    );
    query.build()
}

fn sort_spec(options: &BlockOptions) -> Option<SortSpec> {
    let field = options.value(keys::SORT_BY);
    let order = options.value(keys::SORT_ORDER);
    if field.is_none() && order.is_none() {
        return None;
    }
    let direction = order.map(Direction::parse).unwrap_or_default();
    Some(SortSpec::new(field.unwrap_or_default(), direction))
}

fn number(options: &BlockOptions, key: &str) -> Option<usize> {
    let raw = options.value(key)?;
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(
                op = "list_query_from_block",
                option = key,
                value = raw,
                "not a number, ignored",
            );
            None
        }
    }
}

fn shows(options: &BlockOptions, key: &str) -> bool {
    options
        .value(key)
        .is_some_and(|v| v.eq_ignore_ascii_case("show"))
}
