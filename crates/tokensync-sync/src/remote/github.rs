use super::{DispatchPayload, RemoteFactory, RemoteRepository};
use crate::error::RemoteError;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tokensync_common_config::GithubConfig;
use tokensync_common_http::{headers, read_text, HttpClient, HttpConfig, HttpError, RequestBuilder};
use tokensync_common_log::spans::{instrument_future, record_error, remote_span};
use tokensync_common_secret::SecretString;

#[derive(Serialize)]
struct DispatchRequest<'a> {
    event_type: &'a str,
    client_payload: &'a DispatchPayload,
}

/// GitHub contents API for reads, `repository_dispatch` for publishing.
#[derive(Debug, Clone)]
pub struct GitHubRepository {
    client: HttpClient,
    raw: RequestBuilder,
    json: RequestBuilder,
    config: GithubConfig,
}

impl GitHubRepository {
    pub fn new(
        config: GithubConfig,
        credential: &SecretString,
        http: HttpConfig,
    ) -> Result<Self, RemoteError> {
        let client = HttpClient::with_config(http)?;
        let base = RequestBuilder::new()
            .base_url(config.api_url.clone())
            .bearer_auth(credential.expose())
            .github_api_version();

        Ok(Self {
            client,
            raw: base.clone().accept(headers::ACCEPT_GITHUB_RAW),
            json: base.accept(headers::ACCEPT_GITHUB_JSON).json_content(),
            config,
        })
    }

    fn contents_path(&self, path: &str) -> String {
        format!(
            "/repos/{}/{}/contents/{}",
            self.config.owner,
            self.config.repo,
            path.trim_start_matches('/')
        )
    }

    fn dispatch_path(&self) -> String {
        format!("/repos/{}/{}/dispatches", self.config.owner, self.config.repo)
    }

    async fn get_contents(&self, path: &str) -> Result<Option<String>, RemoteError> {
        let response = self
            .client
            .get(
                &self.raw,
                &self.contents_path(path),
                &[("ref", self.config.branch.as_str())],
            )
            .await?;

        match HttpClient::check_response(response).await {
            Ok(response) => Ok(Some(read_text(response).await?)),
            Err(e) if e.is_not_found() => {
                tracing::debug!(path, "file not published yet");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn post_dispatch(&self, payload: &DispatchPayload) -> Result<(), RemoteError> {
        let body = DispatchRequest {
            event_type: &self.config.event_type,
            client_payload: payload,
        };
        let response = self
            .client
            .post_json(&self.json, &self.dispatch_path(), &body)
            .await?;

        match HttpClient::check_response(response).await {
            Ok(_) => Ok(()),
            Err(HttpError::ClientError { status, body } | HttpError::ServerError { status, body }) => {
                Err(RemoteError::Rejected { status, body })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl RemoteRepository for GitHubRepository {
    async fn fetch_file(&self, path: &str) -> Result<Option<String>, RemoteError> {
        let span = remote_span("fetch", path);
        let result = instrument_future(self.get_contents(path), span.clone()).await;
        if let Err(e) = &result {
            span.in_scope(|| record_error(e));
        }
        result
    }

    async fn dispatch(&self, payload: &DispatchPayload) -> Result<(), RemoteError> {
        tracing::info!(
            repo = %self.config.slug(),
            event_type = %self.config.event_type,
            files = payload.files.len(),
            "sending dispatch"
        );
        let span = remote_span("dispatch", &self.dispatch_path());
        let result = instrument_future(self.post_dispatch(payload), span.clone()).await;
        if let Err(e) = &result {
            span.in_scope(|| record_error(e));
        }
        result
    }
}

/// Connects [`GitHubRepository`] instances for a configured repository.
#[derive(Debug, Clone)]
pub struct GitHubFactory {
    config: GithubConfig,
    request_timeout: Duration,
}

impl GitHubFactory {
    pub fn new(config: GithubConfig, request_timeout: Duration) -> Self {
        Self {
            config,
            request_timeout,
        }
    }
}

impl RemoteFactory for GitHubFactory {
    fn connect(&self, credential: &SecretString) -> Result<Box<dyn RemoteRepository>, RemoteError> {
        let http = HttpConfig::with_timeout(self.request_timeout);
        Ok(Box::new(GitHubRepository::new(
            self.config.clone(),
            credential,
            http,
        )?))
    }
}
