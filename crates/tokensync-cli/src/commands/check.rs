//! Check command implementation.

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, ValueHint};
use serde::Serialize;
use tokensync_sync::{CheckReport, SyncOptions};
use tokensync_tokens::{ExtractionStats, ValidationIssue};

use super::{orchestrator, source, Session};
use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::Output;

/// Extract and validate without publishing
#[derive(Debug, Parser)]
pub struct CheckCommand {
    /// Variable export to read
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub input: PathBuf,
}

impl CheckCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let source = source(Some(self.input.as_path())).await?;
        let options = SyncOptions::from_config(&ctx.config);
        let mut session = Session::start(ctx, orchestrator(ctx, source, options)?);

        let result = session.orchestrator.check().await;
        let report = session.finish(result).await?;

        let summary = CheckSummary::from(report);
        Output::new(ctx.format)
            .print(&summary)
            .map_err(|e| CliError::Io {
                message: format!("failed to write report: {e}"),
            })?;

        if !summary.valid {
            return Err(CliError::Validation {
                message: format!("{} validation error(s)", summary.errors.len()),
            });
        }
        Ok(())
    }
}

/// Check result as printed.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "check")]
struct CheckSummary {
    valid: bool,
    stats: ExtractionStats,
    warnings: Vec<String>,
    errors: Vec<ValidationIssue>,
}

impl From<CheckReport> for CheckSummary {
    fn from(report: CheckReport) -> Self {
        let mut warnings = report.extraction_warnings;
        warnings.extend(report.validation.warnings.iter().map(ToString::to_string));
        Self {
            valid: report.validation.valid,
            stats: report.stats,
            warnings,
            errors: report.validation.errors,
        }
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "extracted {}", self.stats)?;
        for warning in &self.warnings {
            writeln!(f, "warning: {warning}")?;
        }
        for error in &self.errors {
            writeln!(f, "error: {error}")?;
        }
        if self.valid {
            write!(f, "ok: tokens are valid")
        } else {
            write!(f, "failed: {} error(s)", self.errors.len())
        }
    }
}
