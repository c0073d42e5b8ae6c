//! REST API clients for the third-party nutrition services.
//!
//! - `FatSecretClient`: OAuth client-credentials; caches its bearer token
//!   and refreshes it transparently once past the expiry margin
//! - `EdamamClient`, `SpoonacularClient`: static API keys, no cached state
//!
//! None of the clients retry. Failures surface as `ApiError` at the root of
//! an `anyhow` chain.

pub mod edamam;
pub mod error;
pub mod fatsecret;
pub(crate) mod http;
pub mod spoonacular;

pub use edamam::EdamamClient;
pub use error::ApiError;
pub use fatsecret::FatSecretClient;
pub use spoonacular::SpoonacularClient;
