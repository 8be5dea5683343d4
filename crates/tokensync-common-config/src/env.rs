//! Environment variable handling.

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("required environment variable not set: {var}")]
    NotSet { var: String },

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

/// Environment variable names.
pub mod vars {
    /// Config file path, overriding `.tokensync/config.yaml`.
    pub const TOKENSYNC_CONFIG: &str = "TOKENSYNC_CONFIG";
    /// Access token used instead of the stored credential.
    pub const TOKENSYNC_GITHUB_TOKEN: &str = "TOKENSYNC_GITHUB_TOKEN";
    pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
    /// Storage file path.
    pub const TOKENSYNC_STORAGE: &str = "TOKENSYNC_STORAGE";
    pub const TOKENSYNC_LOG_LEVEL: &str = "TOKENSYNC_LOG_LEVEL";
    pub const TOKENSYNC_ENV: &str = "TOKENSYNC_ENV";
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Environment configuration.
pub struct Environment {
    _guard: (),
}

impl Environment {
    /// Load `.env`, `.env.local` and `.env.{TOKENSYNC_ENV}` from the
    /// working directory. Variables already set are not overridden.
    pub fn init() -> Result<Self, EnvError> {
        Self::init_in(Path::new("."))
    }

    /// Like [`Environment::init`], reading files from `dir`.
    pub fn init_in(dir: &Path) -> Result<Self, EnvError> {
        load_optional(dir.join(".env"))?;
        load_optional(dir.join(".env.local"))?;

        if let Ok(name) = env::var(vars::TOKENSYNC_ENV) {
            load_optional(dir.join(format!(".env.{name}")))?;
        }

        Ok(Self { _guard: () })
    }

    /// Get a required string variable.
    pub fn require(var: &str) -> Result<String, EnvError> {
        env::var(var).map_err(|_| EnvError::NotSet {
            var: var.to_string(),
        })
    }

    /// Get an optional, non-empty string variable.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    pub fn get_or(var: &str, default: &str) -> String {
        Self::get(var).unwrap_or_else(|| default.to_string())
    }

    /// Get a boolean variable.
    pub fn get_bool(var: &str) -> Option<bool> {
        env::var(var)
            .ok()
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
    }

    /// Get an integer variable.
    pub fn get_int<T: std::str::FromStr>(var: &str) -> Result<Option<T>, EnvError> {
        match env::var(var) {
            Ok(v) => v.parse().map(Some).map_err(|_| EnvError::InvalidValue {
                var: var.to_string(),
                message: "expected integer".to_string(),
            }),
            Err(_) => Ok(None),
        }
    }

    /// Access token from the environment, preferring `TOKENSYNC_GITHUB_TOKEN`.
    pub fn github_token() -> Option<String> {
        Self::get(vars::TOKENSYNC_GITHUB_TOKEN).or_else(|| Self::get(vars::GITHUB_TOKEN))
    }

    /// Config path override.
    pub fn config_path() -> Option<PathBuf> {
        Self::get(vars::TOKENSYNC_CONFIG).map(PathBuf::from)
    }
}

fn load_optional(path: PathBuf) -> Result<(), EnvError> {
    match dotenvy::from_path(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}
