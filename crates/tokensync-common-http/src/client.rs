//! HTTP client configuration.

use crate::request::RequestBuilder;
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use std::time::Duration;

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
    /// User agent string. GitHub rejects requests without one.
    pub user_agent: String,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// Enable gzip decompression.
    pub gzip: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("tokensync/{}", env!("CARGO_PKG_VERSION")),
            pool_max_idle_per_host: 4,
            gzip: true,
        }
    }
}

impl HttpConfig {
    /// Default config with the given request timeout.
    pub fn with_timeout(request_timeout: Duration) -> Self {
        Self {
            request_timeout,
            connect_timeout: request_timeout.min(Duration::from_secs(10)),
            ..Self::default()
        }
    }
}

/// Build a configured HTTP client.
pub fn build_client(config: HttpConfig) -> Result<Client, HttpError> {
    let mut builder = ClientBuilder::new()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(&config.user_agent)
        .pool_max_idle_per_host(config.pool_max_idle_per_host);

    if config.gzip {
        builder = builder.gzip(true);
    }

    builder.build().map_err(HttpError::ClientBuild)
}

/// HTTP errors.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("server error: {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("client error: {status}: {body}")]
    ClientError { status: u16, body: String },

    #[error("invalid response body (status {status}): {message}")]
    Decode { status: u16, message: String },
}

impl HttpError {
    /// Response status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } | Self::ClientError { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Response body of a rejected request.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::ServerError { body, .. } | Self::ClientError { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Request(e)
        }
    }
}

/// Shared HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default config.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a new HTTP client with custom config.
    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        let inner = build_client(config)?;
        Ok(Self { inner })
    }

    /// Get the inner reqwest client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// GET `path` relative to the request's base URL.
    pub async fn get(
        &self,
        request: &RequestBuilder,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Response, HttpError> {
        let url = request.url(path);
        tracing::debug!(%url, "GET");
        let response = self
            .inner
            .get(&url)
            .headers(request.headers().clone())
            .query(query)
            .send()
            .await?;
        tracing::debug!(status = %response.status(), %url, "GET response");
        Ok(response)
    }

    /// POST a JSON body to `path` relative to the request's base URL.
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        request: &RequestBuilder,
        path: &str,
        body: &T,
    ) -> Result<Response, HttpError> {
        let url = request.url(path);
        tracing::debug!(%url, "POST");
        let response = self
            .inner
            .post(&url)
            .headers(request.headers().clone())
            .json(body)
            .send()
            .await?;
        tracing::debug!(status = %response.status(), %url, "POST response");
        Ok(response)
    }

    /// Check response status and convert errors.
    pub async fn check_response(response: Response) -> Result<Response, HttpError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(HttpError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();

        if status.is_server_error() {
            Err(HttpError::ServerError {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(HttpError::ClientError {
                status: status.as_u16(),
                body,
            })
        }
    }
}
