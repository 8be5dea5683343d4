//! Sync orchestration for tokensync.
//!
//! The [`SyncOrchestrator`] reads variables from a [`VariableSource`],
//! extracts and validates token files, compares them with the published
//! repository and dispatches the changed files. Progress is reported as
//! [`SyncEvent`]s on a broadcast channel.

pub mod credential;
pub mod error;
pub mod event;
pub mod local;
pub mod orchestrator;
pub mod remote;
pub mod source;
pub mod state;

pub use credential::{keys, CredentialStore};
pub use error::{ErrorKind, RemoteError, SourceError, SyncError, SyncResult};
pub use event::{SyncCommand, SyncEvent};
pub use local::write_files;
pub use orchestrator::{CheckReport, SaveReport, SyncOptions, SyncOrchestrator, SyncReport, SyncStatus};
pub use remote::{DispatchPayload, GitHubFactory, GitHubRepository, RemoteFactory, RemoteRepository};
pub use source::{load_graph, SnapshotSource, VariableSource};
pub use state::SyncState;
