//! Configuration file loading and parsing.

use crate::types::TokensyncConfig;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory holding the config file, relative to the project directory.
pub const CONFIG_DIR: &str = ".tokensync";
/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

static ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("valid regex"));

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// Configuration loader.
pub struct ConfigLoader {
    config_path: PathBuf,
    explicit: bool,
}

impl ConfigLoader {
    /// Create a loader for `.tokensync/config.yaml` under the project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            config_path: project_dir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE),
            explicit: false,
        }
    }

    /// Create a loader for an explicitly named file, which must exist.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            explicit: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load and validate the configuration.
    ///
    /// A missing default file yields the defaults.
    pub fn load(&self) -> Result<TokensyncConfig, ConfigError> {
        if !self.config_path.exists() {
            if self.explicit {
                return Err(ConfigError::NotFound {
                    path: self.config_path.clone(),
                });
            }
            return Ok(TokensyncConfig::default());
        }

        let contents = std::fs::read_to_string(&self.config_path)?;
        let expanded = expand_env_vars(&contents)?;

        let config: TokensyncConfig =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        validate(&config)?;
        Ok(config)
    }

    /// Save configuration to the loader's path.
    pub fn save(&self, config: &TokensyncConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(&self.config_path, yaml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut missing = None;
    let expanded = ENV_VAR.replace_all(content, |caps: &Captures| {
        match std::env::var(&caps[1]) {
            Ok(value) => value,
            Err(_) => match caps.get(2) {
                Some(default) => default.as_str().to_string(),
                None => {
                    missing.get_or_insert_with(|| caps[1].to_string());
                    String::new()
                }
            },
        }
    });

    match missing {
        Some(var) => Err(ConfigError::EnvVarNotFound { var }),
        None => Ok(expanded.into_owned()),
    }
}

/// Checks every command relies on.
pub fn validate(config: &TokensyncConfig) -> Result<(), ConfigError> {
    if config.sync.request_timeout_secs == 0 {
        return Err(ConfigError::invalid(
            "sync.request_timeout_secs must be greater than 0",
        ));
    }

    if config.sync.source.trim().is_empty() {
        return Err(ConfigError::invalid("sync.source must not be empty"));
    }

    if config.github.event_type.trim().is_empty() {
        return Err(ConfigError::invalid("github.event_type must not be empty"));
    }

    url::Url::parse(&config.github.api_url)
        .map_err(|e| ConfigError::invalid(format!("github.api_url is not a valid URL: {e}")))?;

    Ok(())
}

/// Additional checks before contacting the repository.
pub fn validate_for_sync(config: &TokensyncConfig) -> Result<(), ConfigError> {
    validate(config)?;

    if config.github.owner.trim().is_empty() {
        return Err(ConfigError::invalid("github.owner must be set"));
    }
    if config.github.repo.trim().is_empty() {
        return Err(ConfigError::invalid("github.repo must be set"));
    }
    if config.github.branch.trim().is_empty() {
        return Err(ConfigError::invalid("github.branch must not be empty"));
    }

    Ok(())
}
