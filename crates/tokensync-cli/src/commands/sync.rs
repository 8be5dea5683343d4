//! Sync command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use tokensync_common_config::validate_for_sync;
use tokensync_sync::SyncOptions;

use super::{orchestrator, source, Session};
use crate::cli::CommandContext;
use crate::error::CliError;

/// Publish changed token files to the repository
#[derive(Debug, Parser)]
pub struct SyncCommand {
    /// Variable export to read
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub input: PathBuf,
}

impl SyncCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        validate_for_sync(&ctx.config)?;

        let source = source(Some(self.input.as_path())).await?;
        let options = SyncOptions::from_config(&ctx.config);
        let mut session = Session::start(ctx, orchestrator(ctx, source, options)?);

        let result = session.orchestrator.sync().await;
        let report = session.finish(result).await?;

        for warning in &report.warnings {
            tracing::warn!(%warning, "sync warning");
        }
        tracing::info!(
            repo = %ctx.config.github.slug(),
            changed = report.changes.len(),
            "sync finished"
        );
        Ok(())
    }
}
