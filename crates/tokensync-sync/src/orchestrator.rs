//! The sync state machine.
//!
//! One orchestrator serves one shell. Each command runs to completion before
//! the next is accepted, and every fatal error is reported as exactly one
//! [`SyncEvent::Error`].

use crate::credential::CredentialStore;
use crate::error::{SyncError, SyncResult};
use crate::event::{SyncCommand, SyncEvent};
use crate::local;
use crate::remote::{DispatchPayload, RemoteFactory, RemoteRepository};
use crate::source::{load_graph, VariableSource};
use crate::state::SyncState;
use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokensync_common_config::TokensyncConfig;
use tokensync_common_log::spans::{instrument_future, sync_span, Timer};
use tokensync_common_secret::SecretString;
use tokensync_tokens::{
    detect_changes, extract, parse_ordered, validate_all, ChangeSet, ExtractionResult,
    ExtractionStats, FileChange, KeyOrder, TokenError, TokenFileId, ValidationReport,
};

/// Settings for a run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Bound on every remote and source call.
    pub request_timeout: Duration,
    /// `source` field of the dispatch payload.
    pub source_name: String,
    /// Where `save_locally` writes.
    pub output_dir: PathBuf,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from_config(&TokensyncConfig::default())
    }
}

impl SyncOptions {
    pub fn from_config(config: &TokensyncConfig) -> Self {
        Self {
            request_timeout: config.sync.request_timeout(),
            source_name: config.sync.source.clone(),
            output_dir: config.output.dir.clone(),
        }
    }
}

/// What a finished sync did.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub stats: ExtractionStats,
    /// Extraction and validation warnings.
    pub warnings: Vec<String>,
    /// Files sent with the dispatch; empty when nothing changed.
    pub changes: Vec<FileChange>,
}

impl SyncReport {
    pub fn published(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Result of extraction plus validation without publishing.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub stats: ExtractionStats,
    pub extraction_warnings: Vec<String>,
    pub validation: ValidationReport,
}

impl CheckReport {
    pub fn is_valid(&self) -> bool {
        self.validation.valid
    }
}

/// Files written by a local save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub stats: ExtractionStats,
    pub written: Vec<PathBuf>,
}

/// Credential presence and last sync time.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncStatus {
    pub has_credential: bool,
    pub last_sync: Option<DateTime<Utc>>,
}

pub struct SyncOrchestrator {
    source: Arc<dyn VariableSource>,
    credentials: CredentialStore,
    remote: Arc<dyn RemoteFactory>,
    options: SyncOptions,
    state: SyncState,
    event_tx: broadcast::Sender<SyncEvent>,
}

impl SyncOrchestrator {
    pub fn new(
        source: Arc<dyn VariableSource>,
        credentials: CredentialStore,
        remote: Arc<dyn RemoteFactory>,
        options: SyncOptions,
        event_tx: broadcast::Sender<SyncEvent>,
    ) -> Self {
        Self {
            source,
            credentials,
            remote,
            options,
            state: SyncState::Idle,
            event_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.event_tx.subscribe()
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Run one protocol command. Outcomes are reported as events.
    pub async fn handle(&mut self, command: SyncCommand) -> SyncResult<()> {
        match command {
            SyncCommand::SyncToGithub => self.sync().await.map(drop),
            SyncCommand::SaveLocally => self.save_locally().await.map(drop),
            SyncCommand::SaveCredential { token } => self.save_credential(&token).await,
            SyncCommand::ClearCredential => self.clear_credential().await,
            SyncCommand::GetStatus => self.status().await.map(drop),
        }
    }

    /// Extract, validate, compare with the repository and publish changes.
    pub async fn sync(&mut self) -> SyncResult<SyncReport> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = sync_span(&run_id);

        let result = instrument_future(self.run_sync(), span.clone()).await;
        let outcome = match &result {
            Ok(report) if report.published() => "published",
            Ok(_) => "no-changes",
            Err(_) => "failed",
        };
        span.record("outcome", outcome);
        result
    }

    async fn run_sync(&mut self) -> SyncResult<SyncReport> {
        self.begin()?;
        self.emit(SyncEvent::SyncStarted);
        match self.sync_stages().await {
            Ok(report) => Ok(report),
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn sync_stages(&mut self) -> SyncResult<SyncReport> {
        let credential = self
            .credentials
            .token()
            .await?
            .ok_or(SyncError::MissingCredential)?;

        let mut extraction = self.extract_stage().await?;

        self.transition(SyncState::Validating)?;
        let validation = self.validate_stage(&extraction)?;

        self.transition(SyncState::Fetching)?;
        let remote = self
            .remote
            .connect(&credential)
            .map_err(|e| SyncError::Configuration(format!("cannot open repository: {e}")))?;
        let (current, remote_order) = self.fetch_stage(remote.as_ref(), &extraction).await?;
        extraction.apply_remote_order(&remote_order);

        self.transition(SyncState::Diffing)?;
        let changes = detect_changes(&extraction.trees(), &current);
        let mut warnings = extraction.warnings.clone();
        warnings.extend(validation.warnings.iter().map(ToString::to_string));

        if changes.is_empty() {
            self.transition(SyncState::Done)?;
            tracing::info!("no changes to publish");
            self.emit(SyncEvent::NoChanges {
                stats: extraction.stats.clone(),
            });
            return Ok(SyncReport {
                stats: extraction.stats,
                warnings,
                changes: Vec::new(),
            });
        }

        self.transition(SyncState::Publishing)?;
        let now = Utc::now();
        let payload = build_payload(&extraction, &changes, &self.options.source_name, now)?;
        self.emit(SyncEvent::progress(format!(
            "Publishing {} changed file(s)",
            payload.files.len()
        )));

        let after = self.options.request_timeout;
        bounded("dispatch", after, remote.dispatch(&payload))
            .await?
            .map_err(|e| SyncError::publish(e, after))?;

        if let Err(e) = self.credentials.record_sync(now).await {
            tracing::warn!(error = %e, "failed to record last sync time");
        }

        self.transition(SyncState::Done)?;
        tracing::info!(files = changes.len(), "published token changes");
        self.emit(SyncEvent::SyncSuccess {
            stats: extraction.stats.clone(),
            changed_files: changes.changes.clone(),
        });

        Ok(SyncReport {
            stats: extraction.stats,
            warnings,
            changes: changes.changes,
        })
    }

    /// Extract and validate, then write every file under the output directory.
    pub async fn save_locally(&mut self) -> SyncResult<SaveReport> {
        self.begin()?;
        match self.save_stages().await {
            Ok(report) => Ok(report),
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn save_stages(&mut self) -> SyncResult<SaveReport> {
        let extraction = self.extract_stage().await?;

        self.transition(SyncState::Validating)?;
        self.validate_stage(&extraction)?;

        let dir = self.options.output_dir.clone();
        let written = local::write_files(&dir, &extraction).await?;

        self.transition(SyncState::Done)?;
        self.emit(SyncEvent::progress(format!(
            "Saved {} file(s) to {}",
            written.len(),
            dir.display()
        )));

        Ok(SaveReport {
            stats: extraction.stats,
            written,
        })
    }

    /// Extract and validate without touching the repository.
    ///
    /// Validation errors are part of the report, not a failure.
    pub async fn check(&mut self) -> SyncResult<CheckReport> {
        self.begin()?;
        let extraction = match self.extract_stage().await {
            Ok(extraction) => extraction,
            Err(err) => return Err(self.fail(err)),
        };

        self.transition(SyncState::Validating)?;
        let validation = validate_all(&extraction.trees());
        self.transition(SyncState::Done)?;

        Ok(CheckReport {
            stats: extraction.stats,
            extraction_warnings: extraction.warnings,
            validation,
        })
    }

    pub async fn save_credential(&mut self, token: &SecretString) -> SyncResult<()> {
        if token.is_blank() {
            let err = SyncError::Configuration("access token must not be empty".to_string());
            return Err(self.report(err));
        }
        if let Err(err) = self.credentials.save_token(token).await {
            return Err(self.report(err.into()));
        }
        self.emit(SyncEvent::progress("Credential saved"));
        self.status().await.map(drop)
    }

    pub async fn clear_credential(&mut self) -> SyncResult<()> {
        if let Err(err) = self.credentials.clear_token().await {
            return Err(self.report(err.into()));
        }
        self.emit(SyncEvent::progress("Credential cleared"));
        self.status().await.map(drop)
    }

    pub async fn status(&mut self) -> SyncResult<SyncStatus> {
        let status = match self.read_status().await {
            Ok(status) => status,
            Err(err) => return Err(self.report(err)),
        };
        self.emit(SyncEvent::Status {
            has_credential: status.has_credential,
            last_sync: status.last_sync.map(|at| at.to_rfc3339()),
        });
        Ok(status)
    }

    async fn read_status(&self) -> SyncResult<SyncStatus> {
        Ok(SyncStatus {
            has_credential: self.credentials.has_token().await?,
            last_sync: self.credentials.last_sync().await?,
        })
    }

    async fn extract_stage(&mut self) -> SyncResult<ExtractionResult> {
        self.emit(SyncEvent::progress("Reading variables"));
        let after = self.options.request_timeout;
        let graph = bounded("reading variables", after, load_graph(self.source.as_ref())).await??;

        let timer = Timer::start("extract");
        let extraction = extract(&graph)?;
        timer.finish();

        for warning in &extraction.warnings {
            tracing::warn!(%warning, "extraction warning");
        }
        tracing::info!(stats = %extraction.stats, "extracted tokens");
        self.emit(SyncEvent::Extracted {
            stats: extraction.stats.clone(),
            warnings: extraction.warnings.clone(),
        });
        Ok(extraction)
    }

    fn validate_stage(&self, extraction: &ExtractionResult) -> SyncResult<ValidationReport> {
        let timer = Timer::start("validate");
        let report = validate_all(&extraction.trees());
        timer.finish();

        if !report.valid {
            return Err(SyncError::Validation {
                errors: report.errors,
                warnings: report.warnings,
            });
        }
        if !report.warnings.is_empty() {
            self.emit(SyncEvent::progress(format!(
                "Validation passed with {} warning(s)",
                report.warnings.len()
            )));
        }
        Ok(report)
    }

    /// Fetch the published counterpart of every built file concurrently.
    ///
    /// Missing or unreadable files stand in as empty skeletons; any other
    /// failure aborts the run.
    async fn fetch_stage(
        &self,
        remote: &dyn RemoteRepository,
        extraction: &ExtractionResult,
    ) -> SyncResult<(BTreeMap<TokenFileId, Value>, BTreeMap<TokenFileId, KeyOrder>)> {
        self.emit(SyncEvent::progress(format!(
            "Fetching {} published file(s)",
            extraction.files.len()
        )));
        let after = self.options.request_timeout;
        let timer = Timer::start("fetch");

        let fetches = extraction.files.keys().map(|id| {
            let id = *id;
            async move {
                let path = id.path();
                let text = bounded(&format!("fetching {path}"), after, remote.fetch_file(path))
                    .await?
                    .map_err(|e| SyncError::fetch(path, e, after))?;
                Ok::<_, SyncError>((id, text))
            }
        });
        let fetched = try_join_all(fetches).await?;
        timer.finish();

        let mut trees = BTreeMap::new();
        let mut orders = BTreeMap::new();
        for (id, text) in fetched {
            let (tree, order) = match text {
                Some(text) => parse_remote(id, &text),
                None => (id.skeleton(), KeyOrder::new()),
            };
            trees.insert(id, tree);
            orders.insert(id, order);
        }
        Ok((trees, orders))
    }

    /// Reset after a finished run and enter `Extracting`.
    fn begin(&mut self) -> SyncResult<()> {
        if self.state.is_terminal() {
            self.transition(SyncState::Idle)?;
        }
        self.transition(SyncState::Extracting)
    }

    fn transition(&mut self, next: SyncState) -> SyncResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(SyncError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        tracing::info!(from = %self.state, to = %next, "state transition");
        self.state = next;
        Ok(())
    }

    /// Enter `Failed` and report the error.
    fn fail(&mut self, err: SyncError) -> SyncError {
        if self.state.can_transition_to(SyncState::Failed) {
            tracing::info!(from = %self.state, to = %SyncState::Failed, "state transition");
            self.state = SyncState::Failed;
        }
        self.report(err)
    }

    fn report(&self, err: SyncError) -> SyncError {
        tracing::error!(kind = %err.kind(), error = %err, "operation failed");
        self.emit(SyncEvent::Error {
            message: err.to_string(),
            kind: err.kind(),
        });
        err
    }

    fn emit(&self, event: SyncEvent) {
        tracing::debug!(?event, "event");
        let _ = self.event_tx.send(event);
    }
}

async fn bounded<F: Future>(operation: &str, after: Duration, future: F) -> SyncResult<F::Output> {
    tokio::time::timeout(after, future)
        .await
        .map_err(|_| SyncError::Timeout {
            operation: operation.to_string(),
            after,
        })
}

/// Parse a published file, recording its key order.
fn parse_remote(id: TokenFileId, text: &str) -> (Value, KeyOrder) {
    match parse_ordered(text) {
        Ok(parsed) => parsed,
        Err(source) => {
            let err = TokenError::Parse {
                file: id.path().to_string(),
                source,
            };
            tracing::warn!(error = %err, "treating unreadable published file as empty");
            (id.skeleton(), KeyOrder::new())
        }
    }
}

fn build_payload(
    extraction: &ExtractionResult,
    changes: &ChangeSet,
    source: &str,
    timestamp: DateTime<Utc>,
) -> SyncResult<DispatchPayload> {
    let mut files = BTreeMap::new();
    for id in changes.files() {
        if let Some(file) = extraction.file(id) {
            let text = file.render().map_err(TokenError::from)?;
            files.insert(id.path().to_string(), text);
        }
    }
    Ok(DispatchPayload {
        files,
        timestamp: timestamp.to_rfc3339(),
        source: source.to_string(),
    })
}
