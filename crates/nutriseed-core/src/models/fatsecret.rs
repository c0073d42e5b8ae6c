use serde::{Deserialize, Serialize};

use super::de::{id_string, number_from_string, one_or_many, opt_number_from_string, u32_from_string};

/// Body of a successful client-credentials exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Body of a failed token exchange (RFC 6749 section 5.2).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl TokenErrorResponse {
    /// Best human-readable description of the failure
    pub fn description(&self) -> Option<&str> {
        self.error_description
            .as_deref()
            .or(self.error.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// FatSecret reports method errors inside a 200 body.
#[derive(Debug, Clone, Deserialize)]
pub struct MethodErrorEnvelope {
    pub error: MethodError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodError {
    #[serde(deserialize_with = "id_string")]
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FoodSearchEnvelope {
    pub foods: FoodSearchPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSearchPage {
    #[serde(rename = "food", default, deserialize_with = "one_or_many")]
    pub foods: Vec<FoodSummary>,
    #[serde(deserialize_with = "u32_from_string")]
    pub max_results: u32,
    #[serde(deserialize_with = "u32_from_string")]
    pub page_number: u32,
    #[serde(deserialize_with = "u32_from_string")]
    pub total_results: u32,
}

impl FoodSearchPage {
    /// Whether more pages follow this one
    pub fn has_more(&self) -> bool {
        let seen = (self.page_number as u64 + 1) * self.max_results as u64;
        seen < self.total_results as u64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSummary {
    #[serde(deserialize_with = "id_string")]
    pub food_id: String,
    pub food_name: String,
    pub food_type: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub food_description: Option<String>,
    #[serde(default)]
    pub food_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FoodEnvelope {
    pub food: FoodDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodDetail {
    #[serde(deserialize_with = "id_string")]
    pub food_id: String,
    pub food_name: String,
    pub food_type: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub food_url: Option<String>,
    pub servings: Servings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Servings {
    #[serde(rename = "serving", default, deserialize_with = "one_or_many")]
    pub items: Vec<Serving>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Serving {
    #[serde(deserialize_with = "id_string")]
    pub serving_id: String,
    pub serving_description: String,
    #[serde(default, deserialize_with = "opt_number_from_string")]
    pub metric_serving_amount: Option<f64>,
    #[serde(default)]
    pub metric_serving_unit: Option<String>,
    #[serde(deserialize_with = "number_from_string")]
    pub calories: f64,
    #[serde(deserialize_with = "number_from_string")]
    pub carbohydrate: f64,
    #[serde(deserialize_with = "number_from_string")]
    pub protein: f64,
    #[serde(deserialize_with = "number_from_string")]
    pub fat: f64,
    #[serde(default, deserialize_with = "opt_number_from_string")]
    pub fiber: Option<f64>,
    #[serde(default, deserialize_with = "opt_number_from_string")]
    pub sugar: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_single_result() {
        let json = r#"{"foods":{"food":{"food_description":"Per 100g - Calories: 52kcal","food_id":"35718","food_name":"Apples","food_type":"Generic","food_url":"https://www.fatsecret.com/calories-nutrition/usda/apples"},"max_results":"20","page_number":"0","total_results":"1"}}"#;
        let env: FoodSearchEnvelope = serde_json::from_str(json).expect("Failed to parse search");
        assert_eq!(env.foods.foods.len(), 1);
        assert_eq!(env.foods.foods[0].food_id, "35718");
        assert_eq!(env.foods.total_results, 1);
        assert!(!env.foods.has_more());
    }

    #[test]
    fn test_parse_search_no_results() {
        let json = r#"{"foods":{"max_results":"20","page_number":"0","total_results":"0"}}"#;
        let env: FoodSearchEnvelope = serde_json::from_str(json).expect("Failed to parse search");
        assert!(env.foods.foods.is_empty());
    }

    #[test]
    fn test_search_missing_contract_field_is_rejected() {
        let json = r#"{"foods":{"food":[{"food_id":"1","food_type":"Generic"}],"max_results":"20","page_number":"0","total_results":"1"}}"#;
        assert!(serde_json::from_str::<FoodSearchEnvelope>(json).is_err());
    }

    #[test]
    fn test_has_more() {
        let page = FoodSearchPage {
            foods: vec![],
            max_results: 20,
            page_number: 0,
            total_results: 45,
        };
        assert!(page.has_more());
        let last = FoodSearchPage { page_number: 2, ..page };
        assert!(!last.has_more());
    }

    #[test]
    fn test_parse_food_detail() {
        let json = r#"{"food":{"food_id":"33691","food_name":"Banana","food_type":"Generic","servings":{"serving":{"serving_id":"32978","serving_description":"1 medium","metric_serving_amount":"118.000","metric_serving_unit":"g","calories":"105","carbohydrate":"26.95","protein":"1.29","fat":"0.39","fiber":"3.1"}}}}"#;
        let env: FoodEnvelope = serde_json::from_str(json).expect("Failed to parse food");
        let serving = &env.food.servings.items[0];
        assert_eq!(serving.calories, 105.0);
        assert_eq!(serving.metric_serving_amount, Some(118.0));
        assert_eq!(serving.fiber, Some(3.1));
        assert_eq!(serving.sugar, None);
    }

    #[test]
    fn test_token_error_description_fallback() {
        let err: TokenErrorResponse = serde_json::from_str(r#"{"error":"invalid_client"}"#).unwrap();
        assert_eq!(err.description(), Some("invalid_client"));
        let err: TokenErrorResponse =
            serde_json::from_str(r#"{"error":"invalid_scope","error_description":"scope not allowed"}"#)
                .unwrap();
        assert_eq!(err.description(), Some("scope not allowed"));
    }
}
