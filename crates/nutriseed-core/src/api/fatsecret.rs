//! FatSecret Platform API client.
//!
//! FatSecret uses OAuth 2.0 client credentials: the client id and secret are
//! exchanged for a short-lived bearer token, which this client caches until
//! shortly before it expires.

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use super::http::{build_client, check_response, parse_body, require_key};
use super::ApiError;
use crate::auth::{Credential, CredentialCache};
use crate::config::Config;
use crate::models::fatsecret::{
    FoodEnvelope, FoodSearchEnvelope, MethodErrorEnvelope, TokenErrorResponse,
};
use crate::models::{FoodDetail, FoodSearchPage, TokenResponse};

/// OAuth token endpoint
const TOKEN_URL: &str = "https://oauth.fatsecret.com/connect/token";

/// Method-style REST endpoint
const API_URL: &str = "https://platform.fatsecret.com/rest/server.api";

/// Scope requested in the client-credentials exchange
const TOKEN_SCOPE: &str = "basic";

/// FatSecret caps `max_results` for foods.search at 50
const MAX_SEARCH_RESULTS: u32 = 50;

pub struct FatSecretClient {
    client: Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    api_url: String,
    cache: CredentialCache,
}

impl FatSecretClient {
    pub fn new(client_id: String, client_secret: String) -> Result<Self> {
        let client_id = require_key(Some(client_id), "FATSECRET_CLIENT_ID")?;
        let client_secret = require_key(Some(client_secret), "FATSECRET_CLIENT_SECRET")?;
        Ok(Self {
            client: build_client()?,
            client_id,
            client_secret,
            token_url: TOKEN_URL.to_string(),
            api_url: API_URL.to_string(),
            cache: CredentialCache::new(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let (id, secret) = config.fatsecret_credentials()?;
        Self::new(id, secret)
    }

    /// Point the client at different endpoints (mock servers, proxies)
    pub fn with_endpoints(mut self, token_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self.api_url = api_url.into();
        self
    }

    /// Snapshot of the cached credential, if any
    pub fn cached_credential(&self) -> Option<Credential> {
        self.cache.snapshot()
    }

    /// Return a valid bearer token, exchanging credentials if the cached one
    /// is missing or past its expiry margin.
    pub async fn get_token(&self) -> Result<String> {
        if let Some(token) = self.cache.fresh_token_at(Utc::now()) {
            debug!("Reusing cached FatSecret token");
            return Ok(token);
        }

        let credential = self.exchange().await?;
        let token = credential.token.clone();
        info!(
            expires_at = %credential.expires_at,
            "Obtained FatSecret access token"
        );
        self.cache.store(credential);
        Ok(token)
    }

    async fn exchange(&self) -> Result<Credential> {
        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials"), ("scope", TOKEN_SCOPE)])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.without_url()))
            .context("Failed to send token request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.without_url()))
            .context("Failed to read token response")?;

        if !status.is_success() {
            let remote: TokenErrorResponse = serde_json::from_str(&body).unwrap_or_default();
            let description = remote
                .description()
                .map(str::to_string)
                .unwrap_or_else(|| format!("status {}: {}", status, ApiError::truncate_body(&body)));
            return Err(ApiError::Auth(description).into());
        }

        let issued_at = Utc::now();
        let token: TokenResponse = parse_body(&body, "FatSecret token response")?;
        if token.access_token.trim().is_empty() {
            return Err(ApiError::InvalidResponse("FatSecret token response has an empty access_token".into()).into());
        }
        if let Some(kind) = token.token_type.as_deref() {
            if !kind.eq_ignore_ascii_case("bearer") {
                debug!(token_type = kind, "Unexpected token type");
            }
        }
        if token.expires_in <= 0 {
            return Err(ApiError::InvalidResponse(format!(
                "FatSecret token response has a non-positive expires_in ({})",
                token.expires_in
            ))
            .into());
        }
        let expires_in = token.expires_in;
        Credential::issued(token.access_token, expires_in, issued_at).ok_or_else(|| {
            ApiError::InvalidResponse(format!(
                "FatSecret token lifetime of {}s is out of range",
                expires_in
            ))
            .into()
        })
    }

    /// Call a FatSecret method and return the raw JSON.
    pub async fn query(&self, method: &str, params: &[(&str, String)]) -> Result<Value> {
        let token = self.get_token().await?;

        let mut query: Vec<(&str, String)> = vec![
            ("method", method.to_string()),
            ("format", "json".to_string()),
        ];
        query.extend(params.iter().cloned());

        debug!(method, "FatSecret request");
        let response = self
            .client
            .get(&self.api_url)
            .bearer_auth(&token)
            .query(&query)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.without_url()))
            .with_context(|| format!("Failed to send FatSecret {} request", method))?;

        let response = check_response(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.without_url()))
            .with_context(|| format!("Failed to read FatSecret {} response", method))?;

        // Method errors come back as 200 with an error envelope
        if let Ok(envelope) = serde_json::from_str::<MethodErrorEnvelope>(&body) {
            return Err(ApiError::Request {
                status: reqwest::StatusCode::OK,
                body: format!("FatSecret error {}: {}", envelope.error.code, envelope.error.message),
            }
            .into());
        }

        parse_body(&body, method)
    }

    async fn query_typed<T: DeserializeOwned>(&self, method: &str, params: &[(&str, String)]) -> Result<T> {
        let value = self.query(method, params).await?;
        serde_json::from_value(value).map_err(|e| {
            ApiError::InvalidResponse(format!("{} response: {}", method, e)).into()
        })
    }

    /// Search foods by free-text expression. Pages are zero-based.
    pub async fn search_foods(&self, expression: &str, page: u32, max_results: u32) -> Result<FoodSearchPage> {
        let max_results = max_results.clamp(1, MAX_SEARCH_RESULTS);
        let envelope: FoodSearchEnvelope = self
            .query_typed(
                "foods.search",
                &[
                    ("search_expression", expression.to_string()),
                    ("page_number", page.to_string()),
                    ("max_results", max_results.to_string()),
                ],
            )
            .await?;
        Ok(envelope.foods)
    }

    /// Fetch one food with all of its servings
    pub async fn get_food(&self, food_id: &str) -> Result<FoodDetail> {
        let envelope: FoodEnvelope = self
            .query_typed("food.get.v2", &[("food_id", food_id.to_string())])
            .await?;
        Ok(envelope.food)
    }
}
