//! Error types for sync operations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokensync_common_http::HttpError;
use tokensync_common_secret::StoreError;
use tokensync_tokens::{TokenError, ValidationIssue};

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Coarse classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Configuration,
    Validation,
    RemoteFetch,
    Timeout,
    Publish,
    Source,
    Storage,
    Io,
    Invariant,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Validation => "validation",
            Self::RemoteFetch => "remote-fetch",
            Self::Timeout => "timeout",
            Self::Publish => "publish",
            Self::Source => "source",
            Self::Storage => "storage",
            Self::Io => "io",
            Self::Invariant => "invariant",
        };
        f.write_str(label)
    }
}

/// Errors from the remote repository.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl RemoteError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

/// Errors from a variable source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid variable snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("variable source unavailable: {0}")]
    Unavailable(String),
}

/// Errors that end a sync, save or check.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no access token stored; save a credential first")]
    MissingCredential,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{}", validation_message(errors))]
    Validation {
        errors: Vec<ValidationIssue>,
        warnings: Vec<ValidationIssue>,
    },

    #[error("failed to fetch {path}: {source}")]
    RemoteFetch {
        path: String,
        #[source]
        source: RemoteError,
    },

    #[error("{operation} timed out after {}s", after.as_secs_f64())]
    Timeout { operation: String, after: Duration },

    #[error("dispatch failed: {0}")]
    Publish(#[source] RemoteError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

fn validation_message(errors: &[ValidationIssue]) -> String {
    let mut message = format!("token validation failed with {} error(s)", errors.len());
    for issue in errors {
        message.push_str("\n  ");
        message.push_str(&issue.to_string());
    }
    message
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential | Self::Configuration(_) => ErrorKind::Configuration,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::RemoteFetch { .. } => ErrorKind::RemoteFetch,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Publish(_) => ErrorKind::Publish,
            Self::Source(_) => ErrorKind::Source,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Io { .. } => ErrorKind::Io,
            Self::Token(_) | Self::InvalidTransition { .. } => ErrorKind::Invariant,
        }
    }

    /// Fetch failure, promoting client timeouts to [`SyncError::Timeout`].
    pub(crate) fn fetch(path: &str, source: RemoteError, after: Duration) -> Self {
        if source.is_timeout() {
            return Self::Timeout {
                operation: format!("fetching {path}"),
                after,
            };
        }
        Self::RemoteFetch {
            path: path.to_string(),
            source,
        }
    }

    /// Dispatch failure, promoting client timeouts to [`SyncError::Timeout`].
    pub(crate) fn publish(source: RemoteError, after: Duration) -> Self {
        if source.is_timeout() {
            return Self::Timeout {
                operation: "dispatch".to_string(),
                after,
            };
        }
        Self::Publish(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokensync_tokens::TokenFileId;

    #[test]
    fn test_kinds() {
        assert_eq!(SyncError::MissingCredential.kind(), ErrorKind::Configuration);
        assert_eq!(
            SyncError::Timeout {
                operation: "dispatch".into(),
                after: Duration::from_secs(30)
            }
            .kind(),
            ErrorKind::Timeout
        );
        assert_eq!(
            SyncError::publish(
                RemoteError::Rejected {
                    status: 422,
                    body: "bad".into()
                },
                Duration::from_secs(1)
            )
            .kind(),
            ErrorKind::Publish
        );
    }

    #[test]
    fn test_client_timeout_becomes_timeout_kind() {
        let err = SyncError::fetch(
            "tokens/src/themes/dim.json",
            RemoteError::Http(HttpError::Timeout),
            Duration::from_secs(5),
        );
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.to_string().contains("tokens/src/themes/dim.json"));
    }

    #[test]
    fn test_validation_message_lists_every_error() {
        let issue = |path: &str| ValidationIssue {
            file: TokenFileId::FoundationColor,
            path: path.to_string(),
            message: "bad".to_string(),
        };
        let err = SyncError::Validation {
            errors: vec![issue("color.foundation.blue.500"), issue("color.foundation.red.100")],
            warnings: Vec::new(),
        };

        let message = err.to_string();
        assert!(message.starts_with("token validation failed with 2 error(s)"));
        assert!(message.contains("color.foundation.blue.500"));
        assert!(message.contains("color.foundation.red.100"));
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::RemoteFetch).unwrap(),
            "\"remote-fetch\""
        );
    }
}
