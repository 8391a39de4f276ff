//! Error types for the seeker crate.

use thiserror::Error;

/// Errors that can occur when building or executing page queries.
///
/// Irregular page data never produces an error: missing fields and
/// unparsable values simply fail to match. These variants cover mistakes
/// in how a query was put together, and index documents that are not JSON.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// An OR filter was run without any conditions.
    #[error("an OR filter needs at least one condition")]
    EmptyOrFilter,

    /// The index document could not be decoded.
    #[error("invalid index document: {0}")]
    InvalidIndex(#[from] serde_json::Error),
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, QueryError>;
