//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use tokensync_common_config::{validate, vars, ConfigLoader, Environment, TokensyncConfig};

use crate::commands::{CheckCommand, CredentialCommand, SaveCommand, StatusCommand, SyncCommand};
use crate::error::CliError;

/// tokensync - publish design tokens from a variable export to GitHub
///
/// Extracts design tokens from a design tool's variables, validates them and
/// dispatches changed token files to a GitHub repository.
#[derive(Debug, Parser)]
#[command(
    name = "tokensync",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "TOKENSYNC_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON document per line
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Publish changed token files to the repository
    Sync(SyncCommand),

    /// Write every token file to a local directory
    Save(SaveCommand),

    /// Extract and validate without publishing
    Check(CheckCommand),

    /// Manage the stored access token
    #[command(subcommand)]
    Credential(CredentialCommand),

    /// Show credential and last sync status
    Status(StatusCommand),
}

impl Cli {
    /// Load configuration from `--config` or `.tokensync/config.yaml`
    pub fn load_config(&self) -> Result<TokensyncConfig, CliError> {
        let loader = match &self.config {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::default(),
        };
        let config = loader.load()?;
        validate(&config)?;
        tracing::debug!(path = %loader.path().display(), "configuration loaded");
        Ok(config)
    }

    /// Execute the selected command
    pub async fn execute(self, config: TokensyncConfig) -> Result<(), CliError> {
        let ctx = CommandContext::new(config, self.format);

        match self.command {
            Command::Sync(cmd) => cmd.execute(&ctx).await,
            Command::Save(cmd) => cmd.execute(&ctx).await,
            Command::Check(cmd) => cmd.execute(&ctx).await,
            Command::Credential(cmd) => cmd.execute(&ctx).await,
            Command::Status(cmd) => cmd.execute(&ctx).await,
        }
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: TokensyncConfig,
    pub format: OutputFormat,
    /// Storage file, from `TOKENSYNC_STORAGE` or the config.
    pub storage_path: Option<PathBuf>,
    /// Token from the environment, used instead of the stored one.
    pub token_override: Option<String>,
}

impl CommandContext {
    pub fn new(config: TokensyncConfig, format: OutputFormat) -> Self {
        let storage_path = Environment::get(vars::TOKENSYNC_STORAGE)
            .map(PathBuf::from)
            .or_else(|| config.storage.path.clone());
        Self {
            config,
            format,
            storage_path,
            token_override: Environment::github_token(),
        }
    }
}
