//! Credential command implementation.

use std::io::{self, BufRead, IsTerminal};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokensync_common_secret::{SecretString, TokenRedactor};
use tokensync_sync::SyncOptions;

use super::{orchestrator, source, Session};
use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

/// Manage the stored access token
#[derive(Debug, Subcommand)]
pub enum CredentialCommand {
    /// Store an access token
    Set(SetCredential),

    /// Remove the stored access token
    Clear,
}

/// Store an access token
#[derive(Debug, Parser)]
pub struct SetCredential {
    /// Token to store; prompted for when omitted
    #[arg(long)]
    pub token: Option<String>,
}

impl CredentialCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        if ctx.token_override.is_some() {
            tracing::warn!("a token from the environment takes precedence over the stored one");
        }

        let token = match self {
            Self::Set(set) => Some(match &set.token {
                Some(token) => SecretString::new(token.clone()),
                None => read_token()?,
            }),
            Self::Clear => None,
        };

        let source = source(None).await?;
        let options = SyncOptions::from_config(&ctx.config);
        let mut session = Session::start(ctx, orchestrator(ctx, source, options)?);

        let result = match &token {
            Some(token) => session.orchestrator.save_credential(token).await,
            None => session.orchestrator.clear_credential().await,
        };
        session.finish(result).await?;

        if let (Some(token), OutputFormat::Text) = (&token, ctx.format) {
            let token = token.expose().trim();
            if !TokenRedactor::looks_like_github_token(token) {
                tracing::warn!("stored value does not look like a GitHub token");
            }
            eprintln!("stored token {}", TokenRedactor::mask(token));
        }
        Ok(())
    }
}

/// Prompt on a terminal, otherwise read one line from stdin.
fn read_token() -> Result<SecretString, CliError> {
    let token = if io::stdin().is_terminal() {
        rpassword::prompt_password("GitHub access token: ").context("failed to read token")?
    } else {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read token from stdin")?;
        line
    };
    Ok(SecretString::new(token.trim().to_string()))
}
