//! CLI error handling.

use std::process::ExitCode;

use thiserror::Error;
use tokensync_common_config::ConfigError;
use tokensync_common_secret::StoreError;
use tokensync_sync::{ErrorKind, SourceError, SyncError};

/// CLI error type with an exit code per category
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        hint: Option<String>,
    },

    #[error("{message}")]
    Io { message: String },

    #[error("{message}")]
    Network { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    Internal { message: String },

    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        match self {
            Self::Config { message, .. } => Self::Config {
                message,
                hint: Some(hint.into()),
            },
            other => other,
        }
    }

    /// Numeric exit status for this error
    pub fn code(&self) -> u8 {
        match self {
            Self::Config { .. } => 2,
            Self::Io { .. } => 3,
            Self::Network { .. } => 4,
            Self::Validation { .. } => 5,
            Self::Internal { .. } | Self::Other(_) => 1,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        let message = err.to_string();
        match (&err, err.kind()) {
            (SyncError::MissingCredential, _) => Self::Config {
                message,
                hint: Some(
                    "run `tokensync credential set` or export TOKENSYNC_GITHUB_TOKEN".to_string(),
                ),
            },
            (SyncError::Source(SourceError::Parse(_)), _) => Self::Validation { message },
            (_, ErrorKind::Configuration) => Self::config(message),
            (_, ErrorKind::Validation) => Self::Validation { message },
            (_, ErrorKind::RemoteFetch | ErrorKind::Timeout | ErrorKind::Publish) => {
                Self::Network { message }
            }
            (_, ErrorKind::Source | ErrorKind::Storage | ErrorKind::Io) => Self::Io { message },
            (_, ErrorKind::Invariant) => Self::Internal { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { .. } => {
                Self::config(err.to_string()).with_hint("check --config or TOKENSYNC_CONFIG")
            }
            ConfigError::ReadError { .. } => Self::Io {
                message: err.to_string(),
            },
            other => Self::config(other.to_string()),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NoLocation => Self::config(err.to_string())
                .with_hint("set storage.path in the config or TOKENSYNC_STORAGE"),
            other => Self::Io {
                message: other.to_string(),
            },
        }
    }
}
