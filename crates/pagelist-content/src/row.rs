//! Block rows: the grammar of authored block tables.
//!
//! A block is a two-column table written by an author. The first column
//! names a property, the second holds its content. [`Cell`] is the closed
//! set of things a value column may contain, so a row's meaning is read by
//! matching on its cells rather than by probing rendered markup.
//!
//! Blocks are usually decoded from JSON:
//!
//! ```
//! use pagelist_content::{Block, RowValue};
//!
//! let block = Block::from_json(r#"[
//!     {"key": "options", "value": "folder=/en/blog/, sortBy=title"},
//!     {"key": "hero", "cells": [{"type": "image", "src": "/media/hero.png", "alt": "Hero"}]}
//! ]"#).unwrap();
//!
//! assert_eq!(block.len(), 2);
//! assert_eq!(block.rows()[1].value(), RowValue::Image("/media/hero.png".into()));
//! ```

use std::borrow::Cow;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, Result};
use crate::options::BlockOptions;

// ============================================================================
// Cells
// ============================================================================

/// One piece of authored content inside a value column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Cell {
    /// Bare text.
    Text { text: String },
    /// A paragraph.
    Paragraph { text: String },
    /// A hyperlink.
    Link {
        href: String,
        #[serde(default)]
        text: String,
    },
    /// An image.
    Image {
        src: String,
        #[serde(default)]
        alt: String,
    },
    /// A bulleted or numbered list.
    List {
        #[serde(default)]
        ordered: bool,
        items: Vec<String>,
    },
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Cell::Text { text: text.into() }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Cell::Paragraph { text: text.into() }
    }

    pub fn link(href: impl Into<String>, text: impl Into<String>) -> Self {
        Cell::Link {
            href: href.into(),
            text: text.into(),
        }
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Cell::Image {
            src: src.into(),
            alt: alt.into(),
        }
    }

    pub fn list<I, S>(ordered: bool, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Cell::List {
            ordered,
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// The text a reader sees for this cell. Images contribute nothing and
    /// list items run together.
    pub fn text_content(&self) -> Cow<'_, str> {
        match self {
            Cell::Text { text } | Cell::Paragraph { text } | Cell::Link { text, .. } => {
                Cow::Borrowed(text)
            }
            Cell::Image { .. } => Cow::Borrowed(""),
            Cell::List { items, .. } => Cow::Owned(items.concat()),
        }
    }
}

// ============================================================================
// Rows
// ============================================================================

/// One authored row: a property name and the content of its value column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRow")]
pub struct Row {
    key: String,
    cells: Vec<Cell>,
}

/// Wire form of a row. `value` is shorthand for a single text cell.
#[derive(Deserialize)]
struct RawRow {
    key: String,
    #[serde(default)]
    cells: Vec<Cell>,
    #[serde(default)]
    value: Option<String>,
}

impl From<RawRow> for Row {
    fn from(raw: RawRow) -> Self {
        let mut cells = raw.cells;
        if let Some(text) = raw.value {
            cells.insert(0, Cell::text(text));
        }
        Row {
            key: raw.key,
            cells,
        }
    }
}

impl Row {
    pub fn new(key: impl Into<String>, cells: Vec<Cell>) -> Self {
        Row {
            key: key.into(),
            cells,
        }
    }

    /// Creates a row whose value column is plain text.
    pub fn with_text(key: impl Into<String>, text: impl Into<String>) -> Self {
        Row::new(key, vec![Cell::text(text)])
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns `true` if the key equals `name`, ignoring case.
    pub fn has_key(&self, name: &str) -> bool {
        self.key.to_lowercase() == name.to_lowercase()
    }

    /// Text content of the value column.
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.text_content()).collect()
    }

    /// Classifies the value column.
    ///
    /// Links take precedence over images, images over paragraphs,
    /// paragraphs over lists and lists over bare text. A single link,
    /// image or paragraph is reported on its own; several are reported as
    /// a list. A row without cells is [`RowValue::Empty`].
    pub fn value(&self) -> RowValue {
        let links = self.collect(|c| match c {
            Cell::Link { href, .. } => Some(href.clone()),
            _ => None,
        });
        if !links.is_empty() {
            return one_or_many(links, RowValue::Link, RowValue::Links);
        }

        let images = self.collect(|c| match c {
            Cell::Image { src, .. } => Some(src.clone()),
            _ => None,
        });
        if !images.is_empty() {
            return one_or_many(images, RowValue::Image, RowValue::Images);
        }

        let paragraphs = self.collect(|c| match c {
            Cell::Paragraph { text } => Some(text.clone()),
            _ => None,
        });
        if !paragraphs.is_empty() {
            return one_or_many(paragraphs, RowValue::Text, RowValue::Texts);
        }

        if self.cells.iter().any(|c| matches!(c, Cell::List { .. })) {
            let items = self
                .cells
                .iter()
                .filter_map(|c| match c {
                    Cell::List { items, .. } => Some(items.iter().cloned()),
                    _ => None,
                })
                .flatten()
                .collect();
            return RowValue::List(items);
        }

        if self.cells.is_empty() {
            RowValue::Empty
        } else {
            RowValue::Text(self.text())
        }
    }

    fn collect<F>(&self, pick: F) -> Vec<String>
    where
        F: FnMut(&Cell) -> Option<String>,
    {
        self.cells.iter().filter_map(pick).collect()
    }
}

fn one_or_many(
    mut items: Vec<String>,
    one: fn(String) -> RowValue,
    many: fn(Vec<String>) -> RowValue,
) -> RowValue {
    if items.len() == 1 {
        one(items.remove(0))
    } else {
        many(items)
    }
}

/// Typed content of a row's value column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RowValue {
    /// One paragraph or bare text.
    Text(String),
    /// Several paragraphs.
    Texts(Vec<String>),
    /// Target of a single link.
    Link(String),
    /// Targets of several links.
    Links(Vec<String>),
    /// Source of a single image.
    Image(String),
    /// Sources of several images.
    Images(Vec<String>),
    /// Items of the row's lists.
    List(Vec<String>),
    /// A parsed `options` or `filters` row.
    Options(BlockOptions),
    /// No content.
    Empty,
}

// ============================================================================
// Blocks
// ============================================================================

/// The rows of one authored block, in document order.
///
/// Option readers consume the rows they interpret, so whatever is left
/// after reading options is the block's remaining content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block {
    rows: Vec<Row>,
}

impl Block {
    pub fn new() -> Self {
        Block::default()
    }

    /// Decodes a JSON array of rows.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and decodes a JSON block file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Block::from_json(&json)
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Adds a row, builder style.
    pub fn with(mut self, row: Row) -> Self {
        self.push(row);
        self
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Index of the first row whose key equals `name`, ignoring case.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.has_key(name))
    }

    /// The first row whose key equals `name`, ignoring case.
    pub fn find(&self, name: &str) -> Option<&Row> {
        self.position(name).map(|i| &self.rows[i])
    }

    /// Removes and returns the row at `index`, if there is one.
    pub fn remove(&mut self, index: usize) -> Option<Row> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    /// Removes every row, returning them in order.
    pub fn take_rows(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.rows)
    }
}

impl FromIterator<Row> for Block {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Block {
            rows: iter.into_iter().collect(),
        }
    }
}
