//! Edamam Food Database API client. Keyed by `app_id` / `app_key`; no state.

use anyhow::Result;
use reqwest::Client;
use tracing::debug;

use super::http::{build_client, get_json, require_key};
use crate::config::Config;
use crate::models::FoodParse;

const BASE_URL: &str = "https://api.edamam.com";

pub struct EdamamClient {
    client: Client,
    app_id: String,
    app_key: String,
    base_url: String,
}

impl EdamamClient {
    pub fn new(app_id: Option<String>, app_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            app_id: require_key(app_id, "EDAMAM_APP_ID")?,
            app_key: require_key(app_key, "EDAMAM_APP_KEY")?,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let (id, key) = config.edamam_keys()?;
        Self::new(Some(id), Some(key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn credentials(&self) -> Vec<(&'static str, String)> {
        vec![("app_id", self.app_id.clone()), ("app_key", self.app_key.clone())]
    }

    /// Parse a free-text ingredient ("1 cup rice") into matching foods
    pub async fn parse_food(&self, ingredient: &str) -> Result<FoodParse> {
        let url = format!("{}/api/food-database/v2/parser", self.base_url);
        let mut query = self.credentials();
        query.push(("ingr", ingredient.to_string()));
        query.push(("nutrition-type", "logging".to_string()));

        debug!(ingredient, "Edamam parse");
        get_json(&self.client, &url, &query, None).await
    }

    /// Food name suggestions for a partial query
    pub async fn autocomplete(&self, q: &str, limit: u32) -> Result<Vec<String>> {
        let url = format!("{}/auto-complete", self.base_url);
        let mut query = self.credentials();
        query.push(("q", q.to_string()));
        query.push(("limit", limit.to_string()));

        debug!(q, limit, "Edamam autocomplete");
        get_json(&self.client, &url, &query, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    #[test]
    fn test_missing_key_is_config_error() {
        let err = EdamamClient::new(Some("id".into()), None)
            .err()
            .expect("missing key should fail");
        match ApiError::find(&err) {
            Some(ApiError::Config(msg)) => assert!(msg.contains("EDAMAM_APP_KEY")),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
