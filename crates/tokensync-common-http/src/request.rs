//! Request header builder.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

/// Common HTTP headers.
pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    /// Contents API media type returning the raw file body.
    pub const ACCEPT_GITHUB_RAW: &str = "application/vnd.github.raw+json";
    pub const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";
    pub const GITHUB_API_VERSION: &str = "x-github-api-version";
    pub const GITHUB_API_VERSION_VALUE: &str = "2022-11-28";
}

/// Base URL plus headers shared by a family of requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    headers: HeaderMap,
    base_url: Option<String>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
            base_url: None,
        }
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Add a header. Invalid names or values are ignored.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add bearer token authorization. The header is marked sensitive.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        if let Ok(mut value) = HeaderValue::try_from(format!("Bearer {}", token.as_ref())) {
            value.set_sensitive(true);
            self.headers.insert(AUTHORIZATION, value);
        }
        self
    }

    pub fn accept(mut self, media_type: &str) -> Self {
        if let Ok(value) = HeaderValue::try_from(media_type) {
            self.headers.insert(ACCEPT, value);
        }
        self
    }

    /// Set content type to JSON.
    pub fn json_content(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(headers::CONTENT_TYPE_JSON));
        self
    }

    /// Pin the GitHub REST API version.
    pub fn github_api_version(self) -> Self {
        self.header(headers::GITHUB_API_VERSION, headers::GITHUB_API_VERSION_VALUE)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Join `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let builder = RequestBuilder::new().base_url("https://api.github.com/");
        assert_eq!(
            builder.url("/repos/acme/tokens/dispatches"),
            "https://api.github.com/repos/acme/tokens/dispatches"
        );
        assert_eq!(
            builder.url("repos/acme/tokens"),
            "https://api.github.com/repos/acme/tokens"
        );
        assert_eq!(RequestBuilder::new().url("/v1/test"), "/v1/test");
    }

    #[test]
    fn test_bearer_auth_is_sensitive() {
        let builder = RequestBuilder::new().bearer_auth("ghp_123");
        let auth = builder.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer ghp_123");
        assert!(auth.is_sensitive());
    }

    #[test]
    fn test_builder_chaining() {
        let builder = RequestBuilder::new()
            .base_url("https://api.github.com")
            .accept(headers::ACCEPT_GITHUB_RAW)
            .github_api_version()
            .json_content()
            .header("X-Custom", "value");

        let map = builder.headers();
        assert_eq!(
            map.get(ACCEPT).unwrap().to_str().unwrap(),
            headers::ACCEPT_GITHUB_RAW
        );
        assert_eq!(
            map.get(headers::GITHUB_API_VERSION).unwrap(),
            headers::GITHUB_API_VERSION_VALUE
        );
        assert!(map.contains_key(CONTENT_TYPE));
        assert!(map.contains_key("x-custom"));
    }

    #[test]
    fn test_invalid_header_ignored() {
        let builder = RequestBuilder::new().header("bad header", "value");
        assert!(builder.headers().is_empty());
    }
}
