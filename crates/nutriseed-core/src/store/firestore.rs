//! Firestore REST v1 store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::value::{field_path, to_firestore_fields};
use super::{DocumentStore, DocumentWrite, WriteMode, MAX_WRITES_PER_COMMIT};
use crate::api::http::{build_client, check_response, parse_body};
use crate::api::ApiError;
use crate::config::Config;

/// Base URL for the production Firestore REST API
const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// The emulator accepts this fixed token as an admin credential
const EMULATOR_TOKEN: &str = "owner";

const DEFAULT_DATABASE: &str = "(default)";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    #[serde(default)]
    write_results: Vec<Value>,
    #[serde(default)]
    commit_time: Option<String>,
}

pub struct FirestoreStore {
    client: Client,
    base_url: String,
    project_id: String,
    database: String,
    access_token: String,
}

impl FirestoreStore {
    pub fn new(project_id: String, access_token: String) -> Result<Self> {
        if access_token.trim().is_empty() {
            return Err(ApiError::missing_config("FIRESTORE_ACCESS_TOKEN").into());
        }
        Ok(Self {
            client: build_client()?,
            base_url: FIRESTORE_BASE_URL.to_string(),
            project_id,
            database: DEFAULT_DATABASE.to_string(),
            access_token,
        })
    }

    /// Target a local emulator, e.g. `localhost:8080`
    pub fn emulator(project_id: String, host: &str) -> Result<Self> {
        let mut store = Self::new(project_id, EMULATOR_TOKEN.to_string())?;
        store.base_url = format!("http://{}/v1", host.trim_end_matches('/'));
        Ok(store)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let project = config.firestore_project()?;
        if let Some(host) = config.firestore_emulator_host.as_deref() {
            debug!(host, "Using Firestore emulator");
            return Self::emulator(project, host);
        }
        let token = config
            .firestore_access_token
            .clone()
            .ok_or_else(|| ApiError::missing_config("FIRESTORE_ACCESS_TOKEN"))?;
        Self::new(project, token)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/{}", self.project_id, self.database)
    }

    fn document_name(&self, collection: &str, key: &str) -> String {
        format!("{}/documents/{}/{}", self.database_path(), collection, key)
    }

    /// Build the `documents:commit` request body.
    pub fn commit_body(&self, writes: &[DocumentWrite]) -> Value {
        let writes: Vec<Value> = writes
            .iter()
            .map(|w| {
                let mut write = json!({
                    "update": {
                        "name": self.document_name(&w.collection, &w.key),
                        "fields": to_firestore_fields(&w.fields),
                    }
                });
                if w.mode == WriteMode::Merge {
                    let paths: Vec<String> = w.fields.keys().map(|k| field_path(k)).collect();
                    write["updateMask"] = json!({ "fieldPaths": paths });
                }
                write
            })
            .collect();
        json!({ "writes": writes })
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn commit(&self, writes: &[DocumentWrite]) -> Result<()> {
        if writes.is_empty() {
            return Ok(());
        }
        if writes.len() > MAX_WRITES_PER_COMMIT {
            return Err(ApiError::Config(format!(
                "commit of {} writes exceeds the Firestore limit of {}",
                writes.len(),
                MAX_WRITES_PER_COMMIT
            ))
            .into());
        }

        let url = format!("{}/{}/documents:commit", self.base_url, self.database_path());
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&self.commit_body(writes))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.without_url()))
            .context("Failed to send Firestore commit")?;

        let response = check_response(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.without_url()))
            .context("Failed to read Firestore commit response")?;

        let parsed: CommitResponse = parse_body(&body, "Firestore commit response")?;
        if parsed.write_results.len() != writes.len() {
            return Err(ApiError::InvalidResponse(format!(
                "Firestore acknowledged {} of {} writes",
                parsed.write_results.len(),
                writes.len()
            ))
            .into());
        }

        debug!(
            writes = writes.len(),
            commit_time = parsed.commit_time.as_deref().unwrap_or("unknown"),
            "Firestore commit applied"
        );
        Ok(())
    }
}
