use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Request failed with status {status}: {body}")]
    Request { status: StatusCode, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        ApiError::Request {
            status,
            body: Self::truncate_body(body),
        }
    }

    pub fn missing_config(variable: &str) -> Self {
        ApiError::Config(format!("{} is not set", variable))
    }

    /// Find the `ApiError` at the root of an anyhow chain, if there is one.
    pub fn find(err: &anyhow::Error) -> Option<&ApiError> {
        err.chain().find_map(|cause| cause.downcast_ref::<ApiError>())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, ApiError::Config(_))
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_truncate_body_short() {
        assert_eq!(ApiError::truncate_body("oops"), "oops");
    }

    #[test]
    fn test_truncate_body_long() {
        let body = "x".repeat(800);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.starts_with(&"x".repeat(500)));
        assert!(truncated.ends_with("(truncated, 800 total bytes)"));
    }

    #[test]
    fn test_truncate_body_respects_char_boundary() {
        // 'é' is two bytes, so byte 500 falls mid-character
        let body = format!("a{}", "é".repeat(400));
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("truncated"));
    }

    #[test]
    fn test_find_through_context() {
        let err: anyhow::Result<()> = Err(ApiError::Auth("invalid_client".into()))
            .context("Failed to obtain token");
        let err = err.unwrap_err();
        assert!(matches!(ApiError::find(&err), Some(ApiError::Auth(m)) if m == "invalid_client"));
    }

    #[test]
    fn test_from_status() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, "missing");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "Request failed with status 404 Not Found: missing");
    }
}
