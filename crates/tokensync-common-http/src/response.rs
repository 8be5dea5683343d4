//! Response body helpers.

use crate::client::HttpError;
use serde::de::DeserializeOwned;

/// Read a response body as text.
pub async fn read_text(response: reqwest::Response) -> Result<String, HttpError> {
    response.text().await.map_err(HttpError::from)
}

/// Parse a JSON response body.
pub async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HttpError> {
    let status = response.status().as_u16();
    let text = read_text(response).await?;
    serde_json::from_str(&text).map_err(|e| HttpError::Decode {
        status,
        message: e.to_string(),
    })
}
