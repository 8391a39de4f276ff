//! Site language context.
//!
//! A [`SiteContext`] is built once per page from its path and the site's
//! [`SiteConfig`]. It answers which language the page is in and where that
//! language's index, navigation and footer live.
//!
//! ```
//! use pagelist_content::{SiteConfig, SiteContext};
//!
//! let site = SiteContext::from_path("/fr/blog/post", SiteConfig::default());
//! assert_eq!(site.language(), "fr");
//! assert_eq!(site.language_index(None), "/fr-index.json");
//! assert_eq!(site.language_nav(false), "/fr/navigation/header");
//!
//! let fallback = SiteContext::from_path("/pt/blog/post", SiteConfig::default());
//! assert_eq!(fallback.language(), "en");
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, Result};

const SKP_SECTION: &str = "statistics-knowledge-portal";

/// Language settings of a site, usually loaded from YAML.
///
/// Every field has a default, so a partial file only overrides what it
/// names:
///
/// ```yaml
/// default_language: en
/// supported_languages: [en, fr, de, zh-cn]
/// index_files:
///   zh-cn: cn-index.json
/// url_language_codes:
///   cn: zh-cn
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Language used when a path does not start with a supported one.
    pub default_language: String,
    /// Languages that have their own directory, index and navigation.
    pub supported_languages: Vec<String>,
    /// Index file per language. Missing entries use `<lang>-index.json`.
    pub index_files: BTreeMap<String, String>,
    /// Statistics portal index file per language. Missing entries use
    /// `skp-<lang>.json`.
    pub skp_index_files: BTreeMap<String, String>,
    /// Language codes that are spelled differently in URLs.
    pub url_language_codes: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let supported: Vec<String> = ["en", "fr", "de", "zh-cn"]
            .into_iter()
            .map(String::from)
            .collect();
        SiteConfig {
            default_language: "en".to_string(),
            index_files: supported
                .iter()
                .map(|l| (l.clone(), format!("{l}-index.json")))
                .collect(),
            skp_index_files: supported
                .iter()
                .map(|l| (l.clone(), format!("skp-{l}.json")))
                .collect(),
            supported_languages: supported,
            url_language_codes: [("cn", "zh-cn"), ("zh-cn", "zh-cn"), ("zh-tw", "zh-tw")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl SiteConfig {
    /// Parses a YAML configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = SiteConfig::from_yaml(&yaml)?;
        tracing::debug!(
            op = "load_site_config",
            path = %path.display(),
            languages = config.supported_languages.len(),
        );
        Ok(config)
    }

    pub fn is_language_supported(&self, code: &str) -> bool {
        self.supported_languages.iter().any(|l| l == code)
    }

    fn index_file(&self, code: &str) -> String {
        self.index_files
            .get(code)
            .cloned()
            .unwrap_or_else(|| format!("{code}-index.json"))
    }

    fn skp_index_file(&self, code: &str) -> String {
        self.skp_index_files
            .get(code)
            .cloned()
            .unwrap_or_else(|| format!("skp-{code}.json"))
    }
}

/// Language context of the page being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteContext {
    config: SiteConfig,
    page_path: String,
    language: String,
}

impl SiteContext {
    /// Builds the context for a page. The language is the path's first
    /// segment when supported, otherwise the default language.
    pub fn from_path(page_path: impl Into<String>, config: SiteConfig) -> Self {
        let page_path = page_path.into();
        let language = page_path
            .split('/')
            .nth(1)
            .filter(|segment| config.is_language_supported(segment))
            .map(String::from)
            .unwrap_or_else(|| config.default_language.clone());
        SiteContext {
            config,
            page_path,
            language,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn page_path(&self) -> &str {
        &self.page_path
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn is_language_supported(&self, code: &str) -> bool {
        self.config.is_language_supported(code)
    }

    pub fn supported_languages(&self) -> &[String] {
        &self.config.supported_languages
    }

    /// Path of the index for `language`, or for the page language when
    /// `None`. Unsupported languages get the default language's index.
    pub fn language_index(&self, language: Option<&str>) -> String {
        let code = language.unwrap_or(&self.language);
        if self.is_language_supported(code) {
            format!("/{}", self.config.index_file(code))
        } else {
            format!("/{}", self.config.index_file(&self.config.default_language))
        }
    }

    /// Path of the statistics portal index for the page language.
    pub fn skp_language_index(&self) -> String {
        let code = if self.is_language_supported(&self.language) {
            self.language.as_str()
        } else {
            self.config.default_language.as_str()
        };
        format!("/{}", self.config.skp_index_file(code))
    }

    /// Path of the navigation fragment for the page language.
    pub fn language_nav(&self, skp: bool) -> String {
        if skp {
            format!("/{}/{SKP_SECTION}/nav", self.language)
        } else {
            format!("/{}/navigation/header", self.language)
        }
    }

    /// Path of the footer fragment for the page language.
    pub fn language_footer(&self, skp: bool) -> String {
        if skp {
            format!("/{}/{SKP_SECTION}/footer", self.language)
        } else {
            format!("/{}/navigation/footer", self.language)
        }
    }

    /// How `code` is spelled in URLs.
    pub fn url_language_code<'a>(&'a self, code: &'a str) -> &'a str {
        self.config
            .url_language_codes
            .get(code)
            .map(String::as_str)
            .unwrap_or(code)
    }

    /// Candidate URLs for this page in another language, best first.
    ///
    /// Returns `None` for unsupported languages. For the page's own
    /// language the only candidate is the current path. Otherwise the
    /// candidates are the translated page, the default-language page and
    /// the target language's home page. Callers pick the first one that
    /// exists.
    ///
    /// ```
    /// use pagelist_content::{SiteConfig, SiteContext};
    ///
    /// let site = SiteContext::from_path("/fr/about/team", SiteConfig::default());
    /// assert_eq!(
    ///     site.language_page_candidates("zh-cn").unwrap(),
    ///     ["/zh-cn/about/team", "/en/about/team", "/zh-cn/"],
    /// );
    /// assert_eq!(site.language_page_candidates("fr").unwrap(), ["/fr/about/team"]);
    /// assert!(site.language_page_candidates("pt").is_none());
    /// ```
    pub fn language_page_candidates(&self, code: &str) -> Option<Vec<String>> {
        if !self.is_language_supported(code) {
            return None;
        }
        if code == self.language {
            let current = if self.page_path.is_empty() {
                "/".to_string()
            } else {
                self.page_path.clone()
            };
            return Some(vec![current]);
        }

        let rest = self.page_path.splitn(3, '/').nth(2).unwrap_or_default();
        let url_code = self.url_language_code(code);
        Some(vec![
            format!("/{url_code}/{rest}"),
            format!("/{}/{rest}", self.config.default_language),
            format!("/{url_code}/"),
        ])
    }
}
