//! Remote repository access.

mod github;

pub use github::{GitHubFactory, GitHubRepository};

use crate::error::RemoteError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokensync_common_secret::SecretString;

/// Changed files sent with a dispatch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchPayload {
    /// Rendered file text by repository path.
    pub files: BTreeMap<String, String>,
    /// RFC 3339 time of the sync.
    pub timestamp: String,
    /// Who published the change.
    pub source: String,
}

/// The repository holding the published token files.
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// Current content of a file, or `None` if it does not exist.
    async fn fetch_file(&self, path: &str) -> Result<Option<String>, RemoteError>;

    /// Publish changed files. The only mutating call.
    async fn dispatch(&self, payload: &DispatchPayload) -> Result<(), RemoteError>;
}

/// Opens a repository once a credential is known.
pub trait RemoteFactory: Send + Sync {
    fn connect(&self, credential: &SecretString) -> Result<Box<dyn RemoteRepository>, RemoteError>;
}
