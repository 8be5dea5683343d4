//! HTTP client utilities for tokensync.

pub mod client;
pub mod request;
pub mod response;

pub use client::{build_client, HttpClient, HttpConfig, HttpError};
pub use request::{headers, RequestBuilder};
pub use response::{parse_json, read_text};
