use serde::{Deserialize, Serialize};

/// Response of the food-database parser endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodParse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub parsed: Vec<ParsedFood>,
    pub hints: Vec<FoodHint>,
}

impl FoodParse {
    /// The exact match if the parser found one, else the first hint
    pub fn best_match(&self) -> Option<&Food> {
        self.parsed
            .first()
            .map(|p| &p.food)
            .or_else(|| self.hints.first().map(|h| &h.food))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFood {
    pub food: Food,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodHint {
    pub food: Food,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub food_id: String,
    pub label: String,
    #[serde(default)]
    pub known_as: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub nutrients: Nutrients,
}

/// Nutrients per 100g, keyed by Edamam's nutrient codes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Nutrients {
    #[serde(rename = "ENERC_KCAL", default)]
    pub kcal: Option<f64>,
    #[serde(rename = "PROCNT", default)]
    pub protein: Option<f64>,
    #[serde(rename = "FAT", default)]
    pub fat: Option<f64>,
    #[serde(rename = "CHOCDF", default)]
    pub carbohydrate: Option<f64>,
    #[serde(rename = "FIBTG", default)]
    pub fiber: Option<f64>,
}
