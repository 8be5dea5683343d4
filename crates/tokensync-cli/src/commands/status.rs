//! Status command implementation.

use clap::Parser;
use tokensync_sync::SyncOptions;

use super::{orchestrator, source, Session};
use crate::cli::CommandContext;
use crate::error::CliError;

/// Show credential and last sync status
#[derive(Debug, Parser)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let source = source(None).await?;
        let options = SyncOptions::from_config(&ctx.config);
        let mut session = Session::start(ctx, orchestrator(ctx, source, options)?);

        let result = session.orchestrator.status().await;
        session.finish(result).await?;
        Ok(())
    }
}
