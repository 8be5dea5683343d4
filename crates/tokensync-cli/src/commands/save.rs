//! Save command implementation.

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use tokensync_sync::SyncOptions;

use super::{orchestrator, source, Session};
use crate::cli::CommandContext;
use crate::error::CliError;

/// Write every token file to a local directory
#[derive(Debug, Parser)]
pub struct SaveCommand {
    /// Variable export to read
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output directory, overriding `output.dir`
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub out: Option<PathBuf>,
}

impl SaveCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let source = source(Some(self.input.as_path())).await?;
        let mut options = SyncOptions::from_config(&ctx.config);
        if let Some(out) = &self.out {
            options.output_dir = out.clone();
        }
        let mut session = Session::start(ctx, orchestrator(ctx, source, options)?);

        let result = session.orchestrator.save_locally().await;
        let report = session.finish(result).await?;

        for path in &report.written {
            tracing::info!(path = %path.display(), "written");
        }
        Ok(())
    }
}
