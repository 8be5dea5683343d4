//! A fake GitHub serving published token files and recording dispatches.

use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use tokensync_common_config::GithubConfig;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const OWNER: &str = "acme";
pub const REPO: &str = "design-tokens";
pub const BRANCH: &str = "main";
pub const EVENT_TYPE: &str = "update-tokens";

/// Unpublished files answer 404 and dispatches answer 204 unless a test
/// mounts something more specific.
pub struct FakeGitHub {
    server: MockServer,
}

impl FakeGitHub {
    pub async fn start() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path_regex(format!("^/repos/{OWNER}/{REPO}/contents/.+$")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest/repos/contents#get-repository-content"
            })))
            .with_priority(10)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(Self::dispatch_path()))
            .respond_with(ResponseTemplate::new(204))
            .with_priority(10)
            .mount(&server)
            .await;

        Self { server }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Repository settings pointing at this server.
    pub fn config(&self) -> GithubConfig {
        GithubConfig {
            owner: OWNER.into(),
            repo: REPO.into(),
            branch: BRANCH.into(),
            api_url: self.url(),
            event_type: EVENT_TYPE.into(),
        }
    }

    pub fn contents_path(file: &str) -> String {
        format!("/repos/{OWNER}/{REPO}/contents/{file}")
    }

    pub fn dispatch_path() -> String {
        format!("/repos/{OWNER}/{REPO}/dispatches")
    }

    /// Serve `text` as the content of `file` on the configured branch.
    pub async fn publish(&self, file: &str, text: &str) {
        Mock::given(method("GET"))
            .and(path(Self::contents_path(file)))
            .and(query_param("ref", BRANCH))
            .respond_with(ResponseTemplate::new(200).set_body_string(text))
            .mount(&self.server)
            .await;
    }

    /// Serve the files of the most recent dispatch, as the repository
    /// workflow would after committing them.
    pub async fn commit_last_dispatch(&self) {
        let payload = self
            .dispatches()
            .await
            .pop()
            .expect("no dispatch to commit");
        let files = payload["client_payload"]["files"]
            .as_object()
            .expect("dispatch carries files");
        for (file, text) in files {
            self.publish(file, text.as_str().expect("file text")).await;
        }
    }

    /// Delay every contents response.
    pub async fn delay_contents(&self, delay: Duration) {
        Mock::given(method("GET"))
            .and(path_regex(format!("^/repos/{OWNER}/{REPO}/contents/.+$")))
            .respond_with(ResponseTemplate::new(404).set_delay(delay))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Fail every contents request with `status`.
    pub async fn fail_contents(&self, status: u16, message: &str) {
        Mock::given(method("GET"))
            .and(path_regex(format!("^/repos/{OWNER}/{REPO}/contents/.+$")))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "message": message })))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Answer dispatches with `status` and a GitHub error body.
    pub async fn reject_dispatches(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(Self::dispatch_path()))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "message": message })))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Bodies of every dispatch received, oldest first.
    pub async fn dispatches(&self) -> Vec<Value> {
        let dispatch = Self::dispatch_path();
        self.received_requests()
            .await
            .iter()
            .filter(|r| r.url.path() == dispatch)
            .map(|r| r.body_json::<Value>().expect("dispatch body is JSON"))
            .collect()
    }

    /// Paths of every contents request, relative to the repository root.
    pub async fn fetched_files(&self) -> Vec<String> {
        let prefix = Self::contents_path("");
        self.received_requests()
            .await
            .iter()
            .filter_map(|r| r.url.path().strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    /// The `client_payload.files` of the only dispatch received.
    pub async fn dispatched_files(&self) -> BTreeMap<String, String> {
        let dispatches = self.dispatches().await;
        assert_eq!(dispatches.len(), 1, "expected exactly one dispatch");
        serde_json::from_value(dispatches[0]["client_payload"]["files"].clone())
            .expect("dispatch files are strings")
    }
}
