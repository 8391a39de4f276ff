//! Error types for the content crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading authored content or site configuration.
///
/// Reading options out of a block never fails; these cover documents that
/// do not decode and files that cannot be read.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The site configuration is not valid YAML for [`SiteConfig`](crate::SiteConfig).
    #[error("invalid site configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A block document is not a JSON array of rows.
    #[error("invalid block rows: {0}")]
    Json(#[from] serde_json::Error),

    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for content operations.
pub type Result<T> = std::result::Result<T, ContentError>;
