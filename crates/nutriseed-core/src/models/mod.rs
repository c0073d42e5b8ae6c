//! Typed response models for the third-party nutrition APIs.
//!
//! Required fields are non-optional on purpose: a response missing them
//! fails to deserialize and surfaces as `ApiError::InvalidResponse`.
//!
//! - `fatsecret`: token exchange, food search, food detail with servings
//! - `edamam`: food-database parser results
//! - `spoonacular`: recipe search, recipe information, ingredient search

pub(crate) mod de;
pub mod edamam;
pub mod fatsecret;
pub mod spoonacular;

pub use edamam::{Food, FoodHint, FoodParse, Nutrients, ParsedFood};
pub use fatsecret::{FoodDetail, FoodSearchPage, FoodSummary, Serving, TokenResponse};
pub use spoonacular::{
    IngredientSearch, IngredientSummary, Recipe, RecipeIngredient, RecipeSearch, RecipeSummary,
};
