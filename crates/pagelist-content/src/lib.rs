//! Content - authored block rows, list options and site language context.
//!
//! Sites built from authored documents describe each block as a small
//! table. This crate reads those tables:
//!
//! - [`Block`], [`Row`] and [`Cell`] model the table and its content
//! - Option readers pull `key=value` settings and filter rows out of a block
//! - [`list_query_from_block`] turns a list block into a
//!   [`ListQuery`](pagelist_seeker::ListQuery)
//! - [`SiteContext`] resolves the page language and the index, navigation
//!   and footer paths that go with it
//!
//! # Example
//!
//! ```rust
//! use pagelist_content::{list_query_from_block, Block, SiteConfig, SiteContext};
//! use pagelist_seeker::parse_index;
//!
//! let site = SiteContext::from_path("/en/blog", SiteConfig::default());
//! assert_eq!(site.language_index(None), "/en-index.json");
//!
//! let mut block = Block::from_json(r#"[
//!     {"key": "options", "value": "folder=/en/blog/, sortBy=title"},
//!     {"key": "Tags", "value": "rust"}
//! ]"#).unwrap();
//! let query = list_query_from_block(&mut block, &["tags"]);
//!
//! let pages = parse_index(r#"[
//!     {"path": "/en/blog/b", "title": "B", "tags": "Rust"},
//!     {"path": "/en/blog/a", "title": "A", "tags": "Rust, Web"},
//!     {"path": "/en/news/c", "title": "C", "tags": "Rust"}
//! ]"#).unwrap();
//!
//! let titles: Vec<_> = query
//!     .run(&pages)
//!     .unwrap()
//!     .iter()
//!     .filter_map(|p| p.text("title"))
//!     .map(|t| t.into_owned())
//!     .collect();
//! assert_eq!(titles, ["A", "B"]);
//! ```

mod error;
mod list;
mod options;
mod row;
mod site;

pub use error::{ContentError, Result};
pub use list::{keys, list_query_from_block};
pub use options::{
    get_block_config, get_block_properties_list, get_block_property, get_list_filter_options,
    parse_block_options, BlockConfig, BlockOptions, OptionValue, DEFAULT_OPTIONS_ROW,
    OBJECT_PROPERTIES,
};
pub use row::{Block, Cell, Row, RowValue};
pub use site::{SiteConfig, SiteContext};
