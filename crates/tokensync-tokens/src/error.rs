//! Error types for token extraction.

use crate::taxonomy::TokenCategory;
use thiserror::Error;

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;

/// Errors raised by the token pipeline.
///
/// Data problems in the source graph are never errors; they are counted as
/// skips. These variants cover broken invariants and malformed documents.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("variable `{name}` classified as {category} but its name does not parse")]
    ClassificationMismatch {
        name: String,
        category: TokenCategory,
    },

    #[error("failed to parse token document `{file}`: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
