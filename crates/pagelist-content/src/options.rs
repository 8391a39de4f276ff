//! Readers that turn authored rows into options and filters.
//!
//! Each reader mirrors how list and card blocks pull settings out of
//! their table. Readers that interpret a row remove it from the block, so
//! later readers only see what is left.
//!
//! | Reader | Row | Removes |
//! |--------|-----|---------|
//! | [`parse_block_options`] | first row, if named | when options were found |
//! | [`get_block_properties_list`] | any named row | when options were found |
//! | [`get_block_property`] | any named row | when its text is non-empty |
//! | [`get_list_filter_options`] | every row | always |
//! | [`get_block_config`] | every row | never |

use serde::ser::{Serialize, SerializeMap, Serializer};

use pagelist_seeker::{Condition, FilterSpec, FilterValue, Op};

use crate::row::{Block, RowValue};

/// Name of the options row when none is given.
pub const DEFAULT_OPTIONS_ROW: &str = "options";

/// Row keys that [`get_block_config`] reads as option lists.
pub const OBJECT_PROPERTIES: [&str; 2] = ["options", "filters"];

// ============================================================================
// Option values
// ============================================================================

/// Value of one authored option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// A bare item such as `compact`.
    Flag,
    /// The right-hand side of `key=value`.
    Value(String),
}

impl OptionValue {
    /// Returns the value text. Flags have none.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Flag => None,
            OptionValue::Value(v) => Some(v),
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, OptionValue::Flag)
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Flag => serializer.serialize_bool(true),
            OptionValue::Value(v) => serializer.serialize_str(v),
        }
    }
}

/// Options read from an authored `key=value, flag` list.
///
/// Keys keep their authored spelling and order; a repeated key replaces the
/// earlier value in place. Lookups ignore case.
///
/// ```
/// use pagelist_content::{BlockOptions, OptionValue};
///
/// let options = BlockOptions::parse("sortBy=title, compact, limit=5");
/// assert_eq!(options.value("sortby"), Some("title"));
/// assert_eq!(options.get("compact"), Some(&OptionValue::Flag));
/// assert_eq!(options.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockOptions {
    entries: Vec<(String, OptionValue)>,
}

impl BlockOptions {
    pub fn new() -> Self {
        BlockOptions::default()
    }

    /// Parses an authored option list.
    ///
    /// Items are separated by commas and trimmed; blank items are skipped.
    /// An item containing `=` becomes a key and value: the value is the text
    /// between the first and second `=`, so `a=b=c` reads as `a=b`. Anything
    /// else is a flag. Text of one character or less yields no options.
    pub fn parse(text: &str) -> Self {
        let mut options = BlockOptions::new();
        if text.chars().count() <= 1 {
            return options;
        }
        for item in text.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            match split_pair(item) {
                Some((key, value)) => options.insert(key, OptionValue::Value(value.to_string())),
                None => options.insert(item, OptionValue::Flag),
            }
        }
        options
    }

    /// Parses an option list with keys and values lower-cased.
    ///
    /// Used for `options` and `filters` rows read as configuration, which
    /// have no minimum length.
    pub fn parse_normalized(text: &str) -> Self {
        let mut options = BlockOptions::new();
        for item in text.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            match split_pair(item) {
                Some((key, value)) => options.insert(
                    key.to_lowercase(),
                    OptionValue::Value(value.to_lowercase()),
                ),
                None => options.insert(item.to_lowercase(), OptionValue::Flag),
            }
        }
        options
    }

    /// Sets an option. An existing key with the same spelling is replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Looks up an option, ignoring case. The last matching entry wins.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.to_lowercase() == key)
            .map(|(_, v)| v)
    }

    /// Looks up an option's value text, ignoring case.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Splits `key=value`, dropping anything after a second `=`.
fn split_pair(item: &str) -> Option<(&str, &str)> {
    let mut parts = item.splitn(3, '=');
    let key = parts.next()?;
    let value = parts.next()?;
    Some((key.trim(), value.trim()))
}

impl Serialize for BlockOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ============================================================================
// Row readers
// ============================================================================

/// Reads options from the block's first row when its key is `row_name`
/// (`options` if `None`), ignoring case.
///
/// The row is removed when at least one option was found. A first row with
/// another name is left alone and yields no options.
///
/// ```
/// use pagelist_content::{parse_block_options, Block, Row};
///
/// let mut block = Block::new()
///     .with(Row::with_text("Options", "folder=/en/blog/, compact"))
///     .with(Row::with_text("tags", "news"));
///
/// let options = parse_block_options(&mut block, None);
/// assert_eq!(options.value("folder"), Some("/en/blog/"));
/// assert_eq!(block.len(), 1);
/// ```
pub fn parse_block_options(block: &mut Block, row_name: Option<&str>) -> BlockOptions {
    let row_name = row_name.unwrap_or(DEFAULT_OPTIONS_ROW);
    let options = match block.first() {
        Some(row) if row.has_key(row_name) => BlockOptions::parse(&row.text()),
        _ => BlockOptions::new(),
    };
    if !options.is_empty() {
        block.remove(0);
    }
    options
}

/// Reads options from the first row anywhere in the block whose key is
/// `row_name`, ignoring case. The row is removed when at least one option
/// was found.
pub fn get_block_properties_list(block: &mut Block, row_name: &str) -> BlockOptions {
    let Some(index) = block.position(row_name) else {
        return BlockOptions::new();
    };
    let options = BlockOptions::parse(&block.rows()[index].text());
    if !options.is_empty() {
        block.remove(index);
    }
    options
}

/// Returns the text of the first row whose key is `row_name`, ignoring
/// case, or `None` when there is no such row.
///
/// The row is removed when its text is non-empty, so an empty row stays in
/// the block and yields `Some("")`.
pub fn get_block_property(block: &mut Block, row_name: &str) -> Option<String> {
    let index = block.position(row_name)?;
    let text = block.rows()[index].text();
    if !text.is_empty() {
        block.remove(index);
    }
    Some(text)
}

/// Turns every remaining row into a filter condition, consuming the block.
///
/// Row keys are matched against `property_names` ignoring case and take the
/// spelling found there; unknown keys are kept as authored. A key may end
/// in `:operator` (`eq`, `contains`, `matches`, `startswith`) to pick the
/// comparison; without one the row is an equality filter.
///
/// Equality and contains values are lower-cased and a value containing a
/// comma becomes a token list. `matches` and `startswith` keep the trimmed
/// text as authored. A pattern that does not compile is logged and kept as
/// a condition that never matches.
///
/// Rows with the same field and operator collapse into one condition: the
/// first row fixes its position and the last row supplies the value.
///
/// ```
/// use pagelist_content::{get_list_filter_options, Block, Row};
/// use pagelist_seeker::Op;
///
/// let mut block = Block::new()
///     .with(Row::with_text("CATEGORY", "News"))
///     .with(Row::with_text("tags", "Rust, Web"))
///     .with(Row::with_text("path:startswith", "/en/"))
///     .with(Row::with_text("category", "Events"));
///
/// let spec = get_list_filter_options(&mut block, &["category", "tags", "path"]);
/// assert_eq!(spec.len(), 3);
/// assert_eq!(spec.conditions()[0].field, "category");
/// assert_eq!(spec.conditions()[2].op, Op::StartsWith);
/// assert!(block.is_empty());
/// ```
pub fn get_list_filter_options<S: AsRef<str>>(
    block: &mut Block,
    property_names: &[S],
) -> FilterSpec {
    let mut spec = FilterSpec::new();
    for row in block.take_rows() {
        let (name, op) = split_operator(row.key());
        let field = canonical_name(name, property_names);
        spec.set(filter_condition(field, op, &row.text()));
    }
    spec
}

/// Splits an optional `:operator` suffix off a filter row key.
fn split_operator(key: &str) -> (&str, Op) {
    match key.rsplit_once(':') {
        Some((name, suffix)) => match suffix.trim().parse::<Op>() {
            Ok(op) => (name.trim(), op),
            Err(_) => (key, Op::Eq),
        },
        None => (key, Op::Eq),
    }
}

fn filter_condition(field: String, op: Op, text: &str) -> Condition {
    if op.is_membership_op() {
        let value = FilterValue::parse(text);
        return match op {
            Op::Contains => Condition::contains(field, value),
            _ => Condition::eq(field, value),
        };
    }

    let raw = text.trim();
    match op {
        Op::StartsWith => Condition::starts_with(field, raw),
        _ => match Condition::matches_pattern(field.as_str(), raw) {
            Ok(condition) => condition,
            Err(e) => {
                tracing::warn!(
                    op = "get_list_filter_options",
                    field = %field,
                    pattern = raw,
                    error = %e,
                    "invalid filter pattern; condition will never match"
                );
                Condition::malformed(field, op, raw)
            }
        },
    }
}

fn canonical_name<S: AsRef<str>>(key: &str, property_names: &[S]) -> String {
    let lower = key.to_lowercase();
    property_names
        .iter()
        .map(AsRef::as_ref)
        .find(|name| name.to_lowercase() == lower)
        .unwrap_or(key)
        .to_string()
}

/// Typed configuration of a block: each row's key and classified value.
///
/// Keys keep their authored spelling; a repeated key replaces the earlier
/// value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockConfig {
    entries: Vec<(String, RowValue)>,
}

impl BlockConfig {
    /// Looks up a row value by its exact key.
    pub fn get(&self, key: &str) -> Option<&RowValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn insert(&mut self, key: String, value: RowValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }
}

impl Serialize for BlockConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Classifies every row of the block without consuming any.
///
/// Rows keyed `options` or `filters` (any case) become
/// [`RowValue::Options`] parsed with [`BlockOptions::parse_normalized`];
/// every other row is classified by [`Row::value`](crate::Row::value).
///
/// ```
/// use pagelist_content::{get_block_config, Block, Cell, Row, RowValue};
///
/// let block = Block::new()
///     .with(Row::with_text("Filters", "Type=Event"))
///     .with(Row::new("link", vec![Cell::link("/en/events", "Events")]));
///
/// let config = get_block_config(&block);
/// assert_eq!(config.get("link"), Some(&RowValue::Link("/en/events".into())));
/// match config.get("Filters") {
///     Some(RowValue::Options(options)) => assert_eq!(options.value("type"), Some("event")),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub fn get_block_config(block: &Block) -> BlockConfig {
    let mut config = BlockConfig::default();
    for row in block.rows() {
        let value = if OBJECT_PROPERTIES.iter().any(|name| row.has_key(name)) {
            RowValue::Options(BlockOptions::parse_normalized(&row.text()))
        } else {
            row.value()
        };
        config.insert(row.key().to_string(), value);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{Cell, Row};
    use pagelist_seeker::{apply_and_filter, apply_or_filter, Membership, OrMode, PageRecord};

    fn block(rows: &[(&str, &str)]) -> Block {
        rows.iter().map(|(k, v)| Row::with_text(*k, *v)).collect()
    }

    // ------------------------------------------------------------------------
    // BlockOptions
    // ------------------------------------------------------------------------

    #[test]
    fn parse_pairs_and_flags() {
        let options = BlockOptions::parse(" folder = /en/news/ ,compact,, limit=3");
        let items: Vec<_> = options.iter().collect();
        assert_eq!(
            items,
            vec![
                ("folder", &OptionValue::Value("/en/news/".into())),
                ("compact", &OptionValue::Flag),
                ("limit", &OptionValue::Value("3".into())),
            ]
        );
    }

    #[test]
    fn parse_drops_text_after_a_second_equals() {
        let options = BlockOptions::parse("query=a=b, limit=3");
        assert_eq!(options.value("query"), Some("a"));
        assert_eq!(options.value("limit"), Some("3"));

        let options = BlockOptions::parse_normalized("Type=Event=Old");
        assert_eq!(options.value("type"), Some("event"));
    }

    #[test]
    fn parse_ignores_single_character_text() {
        assert!(BlockOptions::parse("x").is_empty());
        assert!(BlockOptions::parse("").is_empty());
        assert_eq!(BlockOptions::parse("xy").len(), 1);
    }

    #[test]
    fn repeated_key_replaces_in_place() {
        let options = BlockOptions::parse("a=1, b, a=2");
        assert_eq!(options.len(), 2);
        assert_eq!(options.value("a"), Some("2"));
    }

    #[test]
    fn parse_normalized_lowercases() {
        let options = BlockOptions::parse_normalized("Type=Event, Featured");
        assert_eq!(options.value("type"), Some("event"));
        assert!(options.get("featured").is_some_and(OptionValue::is_flag));
        // No minimum length.
        assert_eq!(BlockOptions::parse_normalized("A").len(), 1);
    }

    #[test]
    fn options_serialize_as_a_map() {
        let options = BlockOptions::parse("limit=3, compact");
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json, serde_json::json!({"limit": "3", "compact": true}));
    }

    // ------------------------------------------------------------------------
    // Readers
    // ------------------------------------------------------------------------

    #[test]
    fn block_options_only_read_the_first_row() {
        let mut b = block(&[("title", "x"), ("options", "limit=3")]);
        assert!(parse_block_options(&mut b, None).is_empty());
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn block_options_custom_row_name() {
        let mut b = block(&[("Settings", "limit=3")]);
        let options = parse_block_options(&mut b, Some("settings"));
        assert_eq!(options.value("limit"), Some("3"));
        assert!(b.is_empty());
    }

    #[test]
    fn block_options_row_kept_when_nothing_parsed() {
        let mut b = block(&[("options", "x")]);
        assert!(parse_block_options(&mut b, None).is_empty());
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn properties_list_found_anywhere() {
        let mut b = block(&[("title", "Latest"), ("Display", "cards, columns=3")]);
        let options = get_block_properties_list(&mut b, "display");
        assert!(options.contains("cards"));
        assert_eq!(options.value("columns"), Some("3"));
        assert_eq!(b.len(), 1);

        assert!(get_block_properties_list(&mut b, "display").is_empty());
    }

    #[test]
    fn single_property() {
        let mut b = block(&[("Heading", "Latest news"), ("subtitle", "")]);
        assert_eq!(get_block_property(&mut b, "heading").as_deref(), Some("Latest news"));
        assert_eq!(b.len(), 1);

        assert_eq!(get_block_property(&mut b, "subtitle").as_deref(), Some(""));
        assert_eq!(b.len(), 1);

        assert_eq!(get_block_property(&mut b, "missing"), None);
    }

    #[test]
    fn filter_options_normalize_names_and_values() {
        let mut b = block(&[("TAGS", "Rust, WEB"), ("Region", "EMEA")]);
        let spec = get_list_filter_options(&mut b, &["tags"]);
        assert!(b.is_empty());

        let conditions = spec.conditions();
        assert_eq!(conditions[0].field, "tags");
        assert_eq!(conditions[0].op, Op::Eq);
        assert!(matches!(&conditions[0].value, FilterValue::Tokens(t) if t == &["rust", "web"]));
        assert_eq!(conditions[1].field, "Region");
        assert!(matches!(&conditions[1].value, FilterValue::Token(t) if t == "emea"));
    }

    #[test]
    fn filter_options_repeated_field_keeps_last_value() {
        let mut b = block(&[("tags", "a"), ("TAGS", "b")]);
        let spec = get_list_filter_options(&mut b, &["tags"]);
        assert_eq!(spec.len(), 1);

        let pages = vec![PageRecord::new().with("tags", "b")];
        assert_eq!(apply_and_filter(&pages, &spec).len(), 1);
    }

    #[test]
    fn filter_options_repeated_field_keeps_first_position() {
        let mut b = block(&[("category", "news"), ("tags", "x"), ("category", "events")]);
        let spec = get_list_filter_options(&mut b, &["category", "tags"]);
        let fields: Vec<_> = spec.conditions().iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["category", "tags"]);

        // The last condition is `tags`, which this page does not satisfy.
        let pages = vec![PageRecord::new().with("category", "events").with("tags", "y")];
        let found = apply_or_filter(&pages, &spec, OrMode::LastWins).unwrap();
        assert!(found.is_empty());
        assert_eq!(apply_or_filter(&pages, &spec, OrMode::Any).unwrap().len(), 1);
    }

    #[test]
    fn filter_options_operator_suffix() {
        let mut b = block(&[
            ("Path:StartsWith", " /en/Blog/ "),
            ("title : matches", "^Intro"),
            ("TAGS:contains", "Rust, Go"),
            ("ratio:16", "9"),
        ]);
        let spec = get_list_filter_options(&mut b, &["path", "title", "tags"]);
        let conditions = spec.conditions();

        assert_eq!(conditions[0].field, "path");
        assert_eq!(conditions[0].op, Op::StartsWith);
        assert!(matches!(&conditions[0].value, FilterValue::Text(t) if t == "/en/Blog/"));

        assert_eq!(conditions[1].field, "title");
        assert_eq!(conditions[1].op, Op::Matches);

        assert_eq!(conditions[2].field, "tags");
        assert_eq!(conditions[2].op, Op::Contains);
        assert!(matches!(&conditions[2].value, FilterValue::Tokens(t) if t == &["rust", "go"]));

        // Not an operator, so the colon belongs to the field name.
        assert_eq!(conditions[3].field, "ratio:16");
        assert_eq!(conditions[3].op, Op::Eq);

        let page = PageRecord::new()
            .with("path", "/en/Blog/post")
            .with("title", "Intro to Rust")
            .with("tags", "go");
        assert!(spec.conditions()[..3].iter().all(|c| c.matches(&page, Membership::All)));
    }

    #[test]
    fn filter_options_invalid_pattern_never_matches() {
        let mut b = block(&[("path:matches", "(unclosed")]);
        let spec = get_list_filter_options(&mut b, &["path"]);
        assert_eq!(spec.len(), 1);
        assert!(matches!(
            &spec.conditions()[0].value,
            FilterValue::Malformed(raw) if raw == "(unclosed"
        ));

        let pages = vec![PageRecord::new().with("path", "(unclosed")];
        assert!(apply_and_filter(&pages, &spec).is_empty());
        assert!(apply_or_filter(&pages, &spec, OrMode::Any).unwrap().is_empty());
    }

    #[test]
    fn filter_options_from_empty_block() {
        let mut b = Block::new();
        let names: [&str; 0] = [];
        assert!(get_list_filter_options(&mut b, &names).is_empty());
    }

    #[test]
    fn block_config_classifies_rows() {
        let b = Block::new()
            .with(Row::with_text("OPTIONS", "Layout=Grid"))
            .with(Row::new("images", vec![Cell::image("/a.png", ""), Cell::image("/b.png", "")]))
            .with(Row::with_text("title", "Hello"))
            .with(Row::new("empty", vec![]));

        let config = get_block_config(&b);
        assert_eq!(config.len(), 4);
        assert!(matches!(
            config.get("OPTIONS"),
            Some(RowValue::Options(o)) if o.value("layout") == Some("grid")
        ));
        assert_eq!(
            config.get("images"),
            Some(&RowValue::Images(vec!["/a.png".into(), "/b.png".into()]))
        );
        assert_eq!(config.get("title"), Some(&RowValue::Text("Hello".into())));
        assert_eq!(config.get("empty"), Some(&RowValue::Empty));
        // Nothing consumed.
        assert_eq!(b.len(), 4);
    }
}
