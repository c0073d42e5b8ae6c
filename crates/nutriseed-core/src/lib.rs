//! nutriseed core library.
//!
//! Building blocks for the fitness app's data tooling:
//!
//! - `api`: FatSecret (token-cached), Edamam and Spoonacular clients
//! - `auth`: bearer credentials with expiry margin, keychain secrets
//! - `config`: file, environment and keychain configuration
//! - `loader`: seed records and the batch loader
//! - `models`: typed third-party response shapes
//! - `store`: document store trait, Firestore REST and in-memory stores

pub mod api;
pub mod auth;
pub mod config;
pub mod loader;
pub mod models;
pub mod store;
pub mod utils;

pub use api::{ApiError, EdamamClient, FatSecretClient, SpoonacularClient};
pub use config::Config;
pub use loader::{BatchLoader, BatchRecord, LoadReport, SeedKind};
pub use store::{DocumentStore, FirestoreStore, MemoryStore};
