//! Request plumbing shared by all API clients.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::ApiError;

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")
}

/// Check if response is successful, returning an error with body if not.
pub(crate) async fn check_response(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body).into())
    }
}

/// Parse a body against its expected shape. Any mismatch is a data error
/// rather than a silently half-filled struct.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        ApiError::InvalidResponse(format!(
            "{}: {} (body: {})",
            what,
            e,
            ApiError::truncate_body(body)
        ))
        .into()
    })
}

/// Send a GET with query parameters and decode the JSON body.
/// Transport errors have the URL stripped since query strings carry API keys.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
    bearer: Option<&str>,
) -> Result<T> {
    let mut request = client.get(url).query(query);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Network(e.without_url()))
        .with_context(|| format!("Failed to send GET request to {}", url))?;

    let response = check_response(response).await?;
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.without_url()))
        .with_context(|| format!("Failed to read response body from {}", url))?;

    parse_body(&body, url)
}

pub(crate) fn require_key(value: Option<String>, variable: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ApiError::missing_config(variable)),
    }
}
