//! Site commands
//!
//! Usage: pagelist index-path --page-path PATH [--language CODE] [--skp]
//!        pagelist site --page-path PATH [--language CODE]

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pagelist_content::SiteContext;
use serde::Serialize;

use super::{emit, load_site_config};
use crate::output::{serialize_value, OutputFormat};

#[derive(Debug, Args)]
pub struct IndexPathArgs {
    /// Path of the page being rendered
    #[arg(long)]
    pub page_path: String,

    /// Language to look up instead of the page language
    #[arg(long, conflicts_with = "skp")]
    pub language: Option<String>,

    /// Print the statistics portal index instead
    #[arg(long)]
    pub skp: bool,

    /// Site configuration (YAML)
    #[arg(long)]
    pub site_config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SiteArgs {
    /// Path of the page being rendered
    #[arg(long)]
    pub page_path: String,

    /// Language to list translation candidates for
    #[arg(long)]
    pub language: Option<String>,

    /// Site configuration (YAML)
    #[arg(long)]
    pub site_config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

/// Resolved paths for one page.
#[derive(Debug, Serialize)]
pub struct SiteSummary {
    pub language: String,
    pub index: String,
    pub skp_index: String,
    pub nav: String,
    pub footer: String,
    pub skp_nav: String,
    pub skp_footer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,
}

impl SiteSummary {
    pub fn new(site: &SiteContext, language: Option<&str>) -> Self {
        SiteSummary {
            language: site.language().to_string(),
            index: site.language_index(None),
            skp_index: site.skp_language_index(),
            nav: site.language_nav(false),
            footer: site.language_footer(false),
            skp_nav: site.language_nav(true),
            skp_footer: site.language_footer(true),
            candidates: language
                .map(|code| site.language_page_candidates(code).unwrap_or_default()),
        }
    }
}

/// Execute index-path command
pub fn execute_index_path(args: IndexPathArgs, out: &mut impl Write) -> Result<()> {
    let config = load_site_config(args.site_config.as_deref())?;
    let site = SiteContext::from_path(args.page_path, config);
    let path = if args.skp {
        site.skp_language_index()
    } else {
        site.language_index(args.language.as_deref())
    };
    emit(out, &format!("{path}\n"))
}

/// Execute site command
pub fn execute_site(args: SiteArgs, out: &mut impl Write) -> Result<()> {
    let config = load_site_config(args.site_config.as_deref())?;
    let site = SiteContext::from_path(args.page_path, config);
    if let Some(code) = args.language.as_deref() {
        if !site.is_language_supported(code) {
            tracing::warn!(op = "site", language = code, "language is not supported");
        }
    }
    let summary = SiteSummary::new(&site, args.language.as_deref());
    emit(out, &serialize_value(&summary, args.output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagelist_content::SiteConfig;

    #[test]
    fn summary_for_a_french_page() {
        let site = SiteContext::from_path("/fr/equipe", SiteConfig::default());
        let summary = SiteSummary::new(&site, Some("de"));
        assert_eq!(summary.language, "fr");
        assert_eq!(summary.index, "/fr-index.json");
        assert_eq!(summary.skp_index, "/skp-fr.json");
        assert_eq!(summary.footer, "/fr/navigation/footer");
        assert_eq!(summary.skp_nav, "/fr/statistics-knowledge-portal/nav");
        assert_eq!(
            summary.candidates.unwrap(),
            ["/de/equipe", "/en/equipe", "/de/"]
        );
    }

    #[test]
    fn index_path_output() {
        let mut out = Vec::new();
        let args = IndexPathArgs {
            page_path: "/zh-cn/news".into(),
            language: None,
            skp: true,
            site_config: None,
        };
        execute_index_path(args, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/skp-zh-cn.json\n");
    }
}
