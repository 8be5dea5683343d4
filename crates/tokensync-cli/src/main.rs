//! tokensync CLI
//!
//! Main entry point for the `tokensync` binary.

use std::process::ExitCode;

use clap::Parser;
use tokensync_cli::{Cli, CliError};
use tokensync_common_config::{vars, Environment};
use tokensync_common_log::{LogConfig, LogLevel};

fn main() -> ExitCode {
    // `.env` may set TOKENSYNC_CONFIG, which argument parsing reads
    let env = Environment::init();
    let cli = Cli::parse();
    init_tracing(&cli);
    if let Err(e) = env {
        tracing::warn!(error = %e, "failed to load .env files");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            if let Some(hint) = e.hint() {
                eprintln!("hint: {hint}");
            }
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.load_config()?;
    cli.execute(config).await
}

/// Flags win over `TOKENSYNC_LOG_LEVEL`/`RUST_LOG`; without either the CLI
/// logs warnings only.
fn init_tracing(cli: &Cli) {
    let mut config = LogConfig::from_env();
    let level_from_env = Environment::get(vars::TOKENSYNC_LOG_LEVEL).is_some()
        || Environment::get(vars::RUST_LOG).is_some();
    if cli.verbose > 0 || cli.quiet || !level_from_env {
        config.level = LogLevel::from_verbosity(cli.verbose, cli.quiet);
    }

    if let Err(e) = tokensync_common_log::init(config) {
        eprintln!("warning: {e}");
    }
}
