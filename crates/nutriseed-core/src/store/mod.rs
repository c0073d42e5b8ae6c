//! Remote document store used by the seed loader.
//!
//! `DocumentStore::commit` is one atomic batch. `FirestoreStore` talks to
//! the Firestore REST API; `MemoryStore` keeps documents in process with the
//! same merge semantics and backs `--dry-run`.

pub mod firestore;
pub mod memory;
pub mod value;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::api::ApiError;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// Firestore's limit on writes per commit
pub const MAX_WRITES_PER_COMMIT: usize = 500;

/// Firestore's limit on document id length in bytes
const MAX_DOCUMENT_ID_BYTES: usize = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace only the listed top-level fields
    Merge,
    /// Replace the whole document
    Overwrite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    pub collection: String,
    pub key: String,
    pub fields: Map<String, Value>,
    pub mode: WriteMode,
}

impl DocumentWrite {
    pub fn merge(collection: impl Into<String>, key: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
            fields,
            mode: WriteMode::Merge,
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Apply all writes atomically. Either every write lands or none do.
    async fn commit(&self, writes: &[DocumentWrite]) -> Result<()>;
}

/// Reject ids Firestore would refuse or misinterpret as a path.
pub fn validate_document_key(key: &str) -> Result<(), ApiError> {
    validate_id("document key", key)
}

/// Collection ids follow the same rules as document keys. A `/` would
/// silently address a subcollection instead.
pub fn validate_collection_id(collection: &str) -> Result<(), ApiError> {
    validate_id("collection id", collection)
}

fn validate_id(what: &str, id: &str) -> Result<(), ApiError> {
    let problem = if id.is_empty() {
        Some("is empty")
    } else if id.contains('/') {
        Some("contains '/'")
    } else if id == "." || id == ".." {
        Some("is a relative path segment")
    } else if id.len() >= 4 && id.starts_with("__") && id.ends_with("__") {
        Some("is reserved (__*__)")
    } else if id.len() > MAX_DOCUMENT_ID_BYTES {
        Some("exceeds 1500 bytes")
    } else {
        None
    };

    match problem {
        Some(why) => Err(ApiError::InvalidRecord(format!("{} {:?} {}", what, id, why))),
        None => Ok(()),
    }
}
