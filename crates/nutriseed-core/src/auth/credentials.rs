use anyhow::{Context, Result};
use keyring::Entry;
use tracing::debug;

const SERVICE_NAME: &str = "nutriseed";

/// Secret names that may live in the OS keychain.
/// Each maps to the environment variable of the same name.
pub const SECRET_NAMES: &[&str] = &[
    "FATSECRET_CLIENT_ID",
    "FATSECRET_CLIENT_SECRET",
    "EDAMAM_APP_ID",
    "EDAMAM_APP_KEY",
    "SPOONACULAR_API_KEY",
    "FIRESTORE_ACCESS_TOKEN",
];

pub struct CredentialStore;

impl CredentialStore {
    pub fn is_known(name: &str) -> bool {
        SECRET_NAMES.contains(&name)
    }

    /// Store a secret in the OS keychain
    pub fn store(name: &str, secret: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, name).context("Failed to create keyring entry")?;
        entry
            .set_password(secret)
            .context("Failed to store secret in keychain")?;
        Ok(())
    }

    /// Retrieve a secret from the OS keychain
    pub fn get(name: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, name).context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve secret from keychain")
    }

    /// Retrieve a secret, treating any keychain failure as absent
    pub fn lookup(name: &str) -> Option<String> {
        match Self::get(name) {
            Ok(secret) => Some(secret),
            Err(e) => {
                debug!(name, error = %e, "No keychain entry");
                None
            }
        }
    }

    /// Delete a stored secret
    pub fn delete(name: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, name).context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete secret from keychain")?;
        Ok(())
    }
}
