//! Spoonacular API client. Authenticated by a static `apiKey` query parameter.

use anyhow::Result;
use reqwest::Client;
use tracing::debug;

use super::http::{build_client, get_json, require_key};
use crate::config::Config;
use crate::models::{IngredientSearch, Recipe, RecipeSearch};

const BASE_URL: &str = "https://api.spoonacular.com";

/// Spoonacular rejects `number` above 100
const MAX_NUMBER: u32 = 100;

pub struct SpoonacularClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SpoonacularClient {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            api_key: require_key(api_key, "SPOONACULAR_API_KEY")?,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(Some(config.spoonacular_key()?))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn search_recipes(&self, query: &str, number: u32) -> Result<RecipeSearch> {
        let url = format!("{}/recipes/complexSearch", self.base_url);
        let params = [
            ("apiKey", self.api_key.clone()),
            ("query", query.to_string()),
            ("number", number.clamp(1, MAX_NUMBER).to_string()),
        ];
        debug!(query, number, "Spoonacular recipe search");
        get_json(&self.client, &url, &params, None).await
    }

    pub async fn recipe_information(&self, id: i64) -> Result<Recipe> {
        let url = format!("{}/recipes/{}/information", self.base_url, id);
        let params = [
            ("apiKey", self.api_key.clone()),
            ("includeNutrition", "false".to_string()),
        ];
        debug!(id, "Spoonacular recipe information");
        get_json(&self.client, &url, &params, None).await
    }

    pub async fn search_ingredients(&self, query: &str, number: u32) -> Result<IngredientSearch> {
        let url = format!("{}/food/ingredients/search", self.base_url);
        let params = [
            ("apiKey", self.api_key.clone()),
            ("query", query.to_string()),
            ("number", number.clamp(1, MAX_NUMBER).to_string()),
        ];
        debug!(query, number, "Spoonacular ingredient search");
        get_json(&self.client, &url, &params, None).await
    }
}
