//! Command implementations.

mod check;
mod credential;
mod save;
mod status;
mod sync;

pub use check::CheckCommand;
pub use credential::{CredentialCommand, SetCredential};
pub use save::SaveCommand;
pub use status::StatusCommand;
pub use sync::SyncCommand;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokensync_common_secret::{FileStore, SecretString};
use tokensync_sync::{
    CredentialStore, GitHubFactory, SnapshotSource, SyncError, SyncOptions, SyncOrchestrator,
    SyncResult,
};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::Output;

const EVENT_CAPACITY: usize = 64;

/// Open the credential store configured for this context.
fn credentials(ctx: &CommandContext) -> Result<CredentialStore, CliError> {
    let store = FileStore::at(ctx.storage_path.as_deref())?;
    tracing::debug!(path = %store.path().display(), "using credential store");
    Ok(CredentialStore::new(Arc::new(store))
        .with_override(ctx.token_override.clone().map(SecretString::new)))
}

/// Load a variable export, or serve an empty graph when no input is needed.
async fn source(input: Option<&Path>) -> Result<SnapshotSource, CliError> {
    match input {
        Some(path) => Ok(SnapshotSource::load(path).await.map_err(SyncError::from)?),
        None => Ok(SnapshotSource::default()),
    }
}

fn orchestrator(
    ctx: &CommandContext,
    source: SnapshotSource,
    options: SyncOptions,
) -> Result<SyncOrchestrator, CliError> {
    let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
    let remote = GitHubFactory::new(ctx.config.github.clone(), options.request_timeout);
    Ok(SyncOrchestrator::new(
        Arc::new(source),
        credentials(ctx)?,
        Arc::new(remote),
        options,
        event_tx,
    ))
}

/// An orchestrator whose events are printed while it runs.
struct Session {
    orchestrator: SyncOrchestrator,
    printer: JoinHandle<()>,
}

impl Session {
    fn start(ctx: &CommandContext, orchestrator: SyncOrchestrator) -> Self {
        let printer = Output::new(ctx.format).spawn_event_printer(orchestrator.subscribe());
        Self {
            orchestrator,
            printer,
        }
    }

    /// Close the event channel and wait for pending events to print.
    async fn finish<T>(self, result: SyncResult<T>) -> Result<T, CliError> {
        drop(self.orchestrator);
        if let Err(e) = self.printer.await {
            tracing::warn!(error = %e, "event printer failed");
        }
        result.map_err(CliError::from)
    }
}
