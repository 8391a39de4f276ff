//! Query command
//!
//! Usage: pagelist query (--index FILE | --index-dir DIR --page-path PATH) [OPTIONS]
//!
//! Options from `--block` are applied first; flags then add filters and
//! override the remaining settings.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use pagelist_content::{list_query_from_block, Block, SiteContext};
use pagelist_seeker::{
    parse_index, Combinator, Direction, FilterValue, ListQuery, OrMode, PageRecord, SortSpec,
};

use super::{emit, load_site_config, parse_pair};
use crate::output::{serialize_records, OutputFormat};

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Index document: a JSON array of records or a {"data": [...]} envelope
    #[arg(long, conflicts_with = "index_dir")]
    pub index: Option<PathBuf>,

    /// Directory holding the per-language index files
    #[arg(long, requires = "page_path")]
    pub index_dir: Option<PathBuf>,

    /// Page path used to pick the language index from --index-dir
    #[arg(long)]
    pub page_path: Option<String>,

    /// Site configuration (YAML)
    #[arg(long)]
    pub site_config: Option<PathBuf>,

    /// Block rows (JSON) holding an options row and filter rows
    #[arg(long)]
    pub block: Option<PathBuf>,

    /// Equality filter; a comma-separated value is a token list
    #[arg(long = "filter", value_name = "FIELD=VALUE", value_parser = parse_pair)]
    pub filters: Vec<(String, String)>,

    /// Keep pages matching any filter instead of all of them
    #[arg(long, conflicts_with = "legacy_or")]
    pub or: bool,

    /// Keep pages matching the last filter (compatibility mode)
    #[arg(long)]
    pub legacy_or: bool,

    /// Regular expression filter on a field's raw value
    #[arg(long = "match", value_name = "FIELD=REGEX", value_parser = parse_pair)]
    pub patterns: Vec<(String, String)>,

    /// Prefix filter on a field's raw value
    #[arg(long = "prefix", value_name = "FIELD=PREFIX", value_parser = parse_pair)]
    pub prefixes: Vec<(String, String)>,

    /// Keep pages whose path starts with this prefix
    #[arg(long)]
    pub folder: Option<String>,

    /// Field to sort on (title, releaseDate, or any other field)
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction
    #[arg(long, value_enum)]
    pub order: Option<Order>,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Number of results to skip
    #[arg(long)]
    pub offset: Option<usize>,

    /// Keep events whose offDateTime has passed
    #[arg(long)]
    pub show_past_events: bool,

    /// Keep pages with a robots directive
    #[arg(long)]
    pub show_noindex: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Order {
    Asc,
    Desc,
}

impl From<Order> for Direction {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => Direction::Ascending,
            Order::Desc => Direction::Descending,
        }
    }
}

/// Execute query command
pub fn execute(args: QueryArgs, out: &mut impl Write) -> Result<()> {
    let index_path = index_path(&args)?;
    let json = std::fs::read_to_string(&index_path)
        .with_context(|| format!("reading index {}", index_path.display()))?;
    let pages = parse_index(&json)
        .with_context(|| format!("decoding index {}", index_path.display()))?;

    let query = build_query(&args, &pages)?;
    let results = query.run(&pages).context("running query")?;

    tracing::info!(
        op = "query",
        index = %index_path.display(),
        pages = pages.len(),
        results = results.len(),
    );
    emit(out, &serialize_records(&results, args.output)?)
}

/// Resolves the index file from --index, or from --index-dir and the page
/// language.
fn index_path(args: &QueryArgs) -> Result<PathBuf> {
    if let Some(index) = &args.index {
        return Ok(index.clone());
    }
    let (Some(dir), Some(page_path)) = (&args.index_dir, &args.page_path) else {
        bail!("either --index or --index-dir with --page-path is required");
    };
    let config = load_site_config(args.site_config.as_deref())?;
    let site = SiteContext::from_path(page_path.as_str(), config);
    let file = site.language_index(None);
    tracing::debug!(op = "index_path", language = site.language(), file = %file);
    Ok(dir.join(file.trim_start_matches('/')))
}

fn build_query(args: &QueryArgs, pages: &[PageRecord]) -> Result<ListQuery> {
    let mut query = match &args.block {
        Some(path) => {
            let mut block = Block::from_file(path).context("loading block")?;
            list_query_from_block(&mut block, &property_names(pages))
        }
        None => ListQuery::new(),
    };

    if let Some(folder) = &args.folder {
        query = query.folder(folder.as_str());
    }
    for (field, value) in &args.filters {
        query = query.where_eq(field, FilterValue::parse(value));
    }
    for (field, pattern) in &args.patterns {
        query = query
            .where_matches(field, pattern)
            .with_context(|| format!("invalid --match pattern for {field}"))?;
    }
    for (field, prefix) in &args.prefixes {
        query = query.where_starts_with(field, prefix);
    }

    if args.or {
        query = query.combinator(Combinator::Or(OrMode::Any));
    } else if args.legacy_or {
        query = query.combinator(Combinator::Or(OrMode::LastWins));
    }

    if args.sort_by.is_some() || args.order.is_some() {
        let current = query.get_sort().cloned().unwrap_or_default();
        let field = args.sort_by.clone().unwrap_or(current.field);
        let direction = args.order.map(Direction::from).unwrap_or(current.direction);
        query = query.sort(SortSpec::new(field, direction));
    }
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }
    if let Some(offset) = args.offset {
        query = query.offset(offset);
    }
    if args.show_past_events {
        query = query.include_past_events(true);
    }
    if args.show_noindex {
        query = query.include_noindex(true);
    }
    Ok(query.build())
}

/// Field names present in the index, used to normalize block filter keys.
fn property_names(pages: &[PageRecord]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|p| p.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}
