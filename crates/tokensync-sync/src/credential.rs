//! Credential and last-sync bookkeeping over a key/value store.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokensync_common_secret::{KeyValueStore, SecretString, StoreError};

/// Storage keys.
pub mod keys {
    pub const GITHUB_TOKEN: &str = "github-token";
    pub const LAST_SYNC: &str = "last-sync";
}

/// Access to the stored credential.
///
/// An override token, typically from the environment, takes precedence over
/// the stored one and is never written back.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    token_override: Option<SecretString>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            token_override: None,
        }
    }

    pub fn with_override(mut self, token: Option<SecretString>) -> Self {
        self.token_override = token.filter(|t| !t.is_blank());
        self
    }

    /// The access token, if one is available.
    pub async fn token(&self) -> Result<Option<SecretString>, StoreError> {
        if let Some(token) = &self.token_override {
            return Ok(Some(token.clone()));
        }
        let stored = self.store.get(keys::GITHUB_TOKEN).await?;
        Ok(stored
            .map(SecretString::new)
            .filter(|token| !token.is_blank()))
    }

    pub async fn has_token(&self) -> Result<bool, StoreError> {
        Ok(self.token().await?.is_some())
    }

    pub async fn save_token(&self, token: &SecretString) -> Result<(), StoreError> {
        self.store
            .set(keys::GITHUB_TOKEN, token.expose().trim())
            .await?;
        tracing::info!("credential saved");
        Ok(())
    }

    pub async fn clear_token(&self) -> Result<(), StoreError> {
        self.store.delete(keys::GITHUB_TOKEN).await?;
        tracing::info!("credential cleared");
        Ok(())
    }

    /// When the last successful dispatch happened.
    ///
    /// An unreadable timestamp is reported as absent.
    pub async fn last_sync(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let stored = self.store.get(keys::LAST_SYNC).await?;
        Ok(stored.and_then(|text| match DateTime::parse_from_rfc3339(&text) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(value = %text, error = %e, "ignoring malformed last-sync timestamp");
                None
            }
        }))
    }

    pub async fn record_sync(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.store.set(keys::LAST_SYNC, &at.to_rfc3339()).await
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("token_override", &self.token_override)
            .finish_non_exhaustive()
    }
}
