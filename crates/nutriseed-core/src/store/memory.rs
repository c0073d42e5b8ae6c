use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::error;

use super::{DocumentStore, DocumentWrite, WriteMode};

type Documents = BTreeMap<(String, String), Map<String, Value>>;

/// In-process document store with Firestore's merge semantics.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<Documents>,
    commits: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn docs(&self) -> MutexGuard<'_, Documents> {
        match self.documents.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("Memory store mutex poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    pub fn get(&self, collection: &str, key: &str) -> Option<Map<String, Value>> {
        self.docs()
            .get(&(collection.to_string(), key.to_string()))
            .cloned()
    }

    /// Number of documents in one collection
    pub fn count(&self, collection: &str) -> usize {
        self.docs().keys().filter(|(c, _)| c == collection).count()
    }

    /// Number of commits applied so far
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn insert(&self, collection: &str, key: &str, fields: Map<String, Value>) {
        self.docs()
            .insert((collection.to_string(), key.to_string()), fields);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn commit(&self, writes: &[DocumentWrite]) -> Result<()> {
        let mut docs = self.docs();
        for write in writes {
            let id = (write.collection.clone(), write.key.clone());
            match write.mode {
                WriteMode::Merge => {
                    let doc = docs.entry(id).or_default();
                    for (field, value) in &write.fields {
                        doc.insert(field.clone(), value.clone());
                    }
                }
                WriteMode::Overwrite => {
                    docs.insert(id, write.fields.clone());
                }
            }
        }
        drop(docs);

        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_merge_keeps_untouched_fields() {
        let store = MemoryStore::new();
        store.insert("exercises", "squat", fields(json!({"name": "Squat", "favorite": true})));

        let write = DocumentWrite::merge("exercises", "squat", fields(json!({"name": "Back Squat", "sets": 5})));
        store.commit(&[write]).await.unwrap();

        let doc = store.get("exercises", "squat").unwrap();
        assert_eq!(doc["name"], "Back Squat");
        assert_eq!(doc["sets"], 5);
        assert_eq!(doc["favorite"], true);
        assert_eq!(store.commits(), 1);
    }

    #[tokio::test]
    async fn test_every_commit_is_counted() {
        let store = MemoryStore::new();
        for i in 0..3 {
            let write = DocumentWrite::merge("menus", format!("day-{}", i), fields(json!({"kcal": 2000})));
            store.commit(&[write]).await.unwrap();
        }
        store.commit(&[]).await.unwrap();

        assert_eq!(store.commits(), 4);
        assert_eq!(store.count("menus"), 3);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_document() {
        let store = MemoryStore::new();
        store.insert("forms", "intake", fields(json!({"title": "Intake", "old": 1})));

        let mut write = DocumentWrite::merge("forms", "intake", fields(json!({"title": "Intake v2"})));
        write.mode = WriteMode::Overwrite;
        store.commit(&[write]).await.unwrap();

        let doc = store.get("forms", "intake").unwrap();
        assert!(doc.get("old").is_none());
        assert_eq!(store.count("forms"), 1);
    }
}
