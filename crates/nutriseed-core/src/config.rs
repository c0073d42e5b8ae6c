//! Application configuration management.
//!
//! Configuration is resolved in three layers, later layers only filling or
//! overriding what earlier ones left:
//!
//! 1. `~/.config/nutriseed/config.json` (optional)
//! 2. environment variables (the CLI loads `.env` first)
//! 3. the OS keychain, for secrets still missing

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::ApiError;
use crate::auth::CredentialStore;

/// Application name used for config directory paths
const APP_NAME: &str = "nutriseed";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub fatsecret_client_id: Option<String>,
    pub fatsecret_client_secret: Option<String>,
    pub edamam_app_id: Option<String>,
    pub edamam_app_key: Option<String>,
    pub spoonacular_api_key: Option<String>,
    pub firestore_project_id: Option<String>,
    pub firestore_access_token: Option<String>,
    pub firestore_emulator_host: Option<String>,
    /// Overrides the per-kind default batch size for loads
    pub batch_size: Option<usize>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            debug!(path = %path.display(), "Loading config file");
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Load the file, then overlay environment and keychain.
    pub fn resolve() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env(|name| std::env::var(name).ok());
        config.fill_from_keyring();
        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Override fields from the environment. Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        for (name, field) in [
            ("FATSECRET_CLIENT_ID", &mut self.fatsecret_client_id),
            ("FATSECRET_CLIENT_SECRET", &mut self.fatsecret_client_secret),
            ("EDAMAM_APP_ID", &mut self.edamam_app_id),
            ("EDAMAM_APP_KEY", &mut self.edamam_app_key),
            ("SPOONACULAR_API_KEY", &mut self.spoonacular_api_key),
            ("FIRESTORE_PROJECT_ID", &mut self.firestore_project_id),
            ("FIRESTORE_ACCESS_TOKEN", &mut self.firestore_access_token),
            ("FIRESTORE_EMULATOR_HOST", &mut self.firestore_emulator_host),
        ] {
            if let Some(value) = get(name) {
                *field = Some(value);
            }
        }

        if let Some(raw) = get("NUTRISEED_BATCH_SIZE") {
            match raw.trim().parse::<usize>() {
                Ok(size) => self.batch_size = Some(size),
                Err(_) => warn!(value = %raw, "Ignoring non-numeric NUTRISEED_BATCH_SIZE"),
            }
        }
    }

    /// Fill secrets that are still unset from the OS keychain.
    pub fn fill_from_keyring(&mut self) {
        for (name, field) in [
            ("FATSECRET_CLIENT_ID", &mut self.fatsecret_client_id),
            ("FATSECRET_CLIENT_SECRET", &mut self.fatsecret_client_secret),
            ("EDAMAM_APP_ID", &mut self.edamam_app_id),
            ("EDAMAM_APP_KEY", &mut self.edamam_app_key),
            ("SPOONACULAR_API_KEY", &mut self.spoonacular_api_key),
            ("FIRESTORE_ACCESS_TOKEN", &mut self.firestore_access_token),
        ] {
            if field.is_none() {
                *field = CredentialStore::lookup(name);
            }
        }
    }

    pub fn fatsecret_credentials(&self) -> Result<(String, String), ApiError> {
        let id = required(&self.fatsecret_client_id, "FATSECRET_CLIENT_ID")?;
        let secret = required(&self.fatsecret_client_secret, "FATSECRET_CLIENT_SECRET")?;
        Ok((id, secret))
    }

    pub fn edamam_keys(&self) -> Result<(String, String), ApiError> {
        let id = required(&self.edamam_app_id, "EDAMAM_APP_ID")?;
        let key = required(&self.edamam_app_key, "EDAMAM_APP_KEY")?;
        Ok((id, key))
    }

    pub fn spoonacular_key(&self) -> Result<String, ApiError> {
        required(&self.spoonacular_api_key, "SPOONACULAR_API_KEY")
    }

    pub fn firestore_project(&self) -> Result<String, ApiError> {
        required(&self.firestore_project_id, "FIRESTORE_PROJECT_ID")
    }
}

fn required(value: &Option<String>, variable: &str) -> Result<String, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::missing_config(variable))
}
