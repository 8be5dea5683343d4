//! Configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration, read from `.tokensync/config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokensyncConfig {
    /// Target repository.
    pub github: GithubConfig,
    /// Sync behaviour.
    pub sync: SyncConfig,
    /// Local output for `save`.
    pub output: OutputConfig,
    /// Credential and last-sync storage.
    pub storage: StorageConfig,
}

/// Repository that receives published token files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub owner: String,
    pub repo: String,
    /// Branch the current token files are read from.
    pub branch: String,
    pub api_url: String,
    /// `event_type` of the dispatch that carries changed files.
    pub event_type: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            branch: "main".to_string(),
            api_url: "https://api.github.com".to_string(),
            event_type: "update-tokens".to_string(),
        }
    }
}

impl GithubConfig {
    /// Whether a target repository has been named.
    pub fn is_configured(&self) -> bool {
        !self.owner.trim().is_empty() && !self.repo.trim().is_empty()
    }

    /// `owner/repo`.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Sync behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Value of the dispatch payload's `source` field.
    pub source: String,
    /// Bound on every remote call.
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source: "tokensync".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl SyncConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Where `save` writes token files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("tokens-out"),
        }
    }
}

/// Persistent key/value storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage file; the platform config directory is used when unset.
    pub path: Option<PathBuf>,
}
