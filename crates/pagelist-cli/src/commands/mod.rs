//! Subcommand implementations.

pub mod block;
pub mod query;
pub mod site;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use pagelist_content::SiteConfig;

/// Loads the site configuration, or the defaults when no file is given.
fn load_site_config(path: Option<&Path>) -> Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::from_file(path).context("loading site configuration"),
        None => Ok(SiteConfig::default()),
    }
}

/// Parses a `FIELD=VALUE` argument.
fn parse_pair(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected FIELD=VALUE, got `{arg}`")),
    }
}

fn emit(out: &mut impl Write, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .context("writing output")?;
    out.flush().context("writing output")
}
