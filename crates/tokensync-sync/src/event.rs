//! Event and command protocol between the orchestrator and its shell.

use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokensync_common_secret::SecretString;
use tokensync_tokens::{ExtractionStats, FileChange};

/// Progress reported while a command runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SyncEvent {
    SyncStarted,
    Progress {
        message: String,
    },
    Extracted {
        stats: ExtractionStats,
        warnings: Vec<String>,
    },
    NoChanges {
        stats: ExtractionStats,
    },
    SyncSuccess {
        stats: ExtractionStats,
        #[serde(rename = "changedFiles")]
        changed_files: Vec<FileChange>,
    },
    Error {
        message: String,
        kind: ErrorKind,
    },
    Status {
        #[serde(rename = "hasCredential")]
        has_credential: bool,
        /// RFC 3339 time of the last successful dispatch.
        #[serde(rename = "lastSync")]
        last_sync: Option<String>,
    },
}

impl SyncEvent {
    pub fn progress(message: impl Into<String>) -> Self {
        Self::Progress {
            message: message.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::NoChanges { .. } | Self::SyncSuccess { .. } | Self::Error { .. }
        )
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SyncStarted => write!(f, "sync started"),
            Self::Progress { message } => write!(f, "{message}"),
            Self::Extracted { stats, warnings } => {
                write!(f, "extracted {stats}")?;
                if !warnings.is_empty() {
                    write!(f, " ({} warning(s))", warnings.len())?;
                }
                Ok(())
            }
            Self::NoChanges { .. } => write!(f, "no changes to publish"),
            Self::SyncSuccess { changed_files, .. } => {
                write!(f, "published {} changed file(s)", changed_files.len())
            }
            Self::Error { message, kind } => write!(f, "{kind} error: {message}"),
            Self::Status {
                has_credential,
                last_sync,
            } => write!(
                f,
                "credential: {}, last sync: {}",
                if *has_credential { "stored" } else { "missing" },
                last_sync.as_deref().unwrap_or("never")
            ),
        }
    }
}

/// Requests accepted by the orchestrator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SyncCommand {
    SyncToGithub,
    SaveLocally,
    SaveCredential { token: SecretString },
    ClearCredential,
    GetStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_wire_shape() {
        let event = SyncEvent::Status {
            has_credential: true,
            last_sync: None,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "status", "hasCredential": true, "lastSync": null})
        );

        let started = serde_json::to_value(SyncEvent::SyncStarted).unwrap();
        assert_eq!(started, json!({"type": "sync-started"}));

        let error = SyncEvent::Error {
            message: "boom".into(),
            kind: ErrorKind::Timeout,
        };
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"type": "error", "message": "boom", "kind": "timeout"})
        );
    }

    #[test]
    fn test_command_parsing() {
        let command: SyncCommand =
            serde_json::from_value(json!({"type": "save-credential", "token": "ghp_1"})).unwrap();
        match command {
            SyncCommand::SaveCredential { token } => assert_eq!(token.expose(), "ghp_1"),
            other => panic!("unexpected {other:?}"),
        }

        let command: SyncCommand =
            serde_json::from_value(json!({"type": "sync-to-github"})).unwrap();
        assert_eq!(command, SyncCommand::SyncToGithub);
    }

    #[test]
    fn test_terminal_events() {
        assert!(SyncEvent::NoChanges {
            stats: ExtractionStats::default()
        }
        .is_terminal());
        assert!(!SyncEvent::progress("fetching").is_terminal());
        assert!(!SyncEvent::SyncStarted.is_terminal());
    }
}
