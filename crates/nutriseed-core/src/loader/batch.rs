use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::record::BatchRecord;
use crate::api::ApiError;
use crate::store::{validate_collection_id, DocumentStore, DocumentWrite, MAX_WRITES_PER_COMMIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub collection: String,
    pub records: usize,
    pub batches: usize,
}

/// Writes records to a store in fixed-size, sequential batches.
#[derive(Debug, Clone, Copy)]
pub struct BatchLoader {
    batch_size: usize,
}

impl BatchLoader {
    pub fn new(batch_size: usize) -> Result<Self, ApiError> {
        if batch_size == 0 || batch_size > MAX_WRITES_PER_COMMIT {
            return Err(ApiError::Config(format!(
                "batch size must be between 1 and {}, got {}",
                MAX_WRITES_PER_COMMIT, batch_size
            )));
        }
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Split records into chunks of at most `batch_size`.
    pub fn plan<'a>(&self, records: &'a [BatchRecord]) -> Vec<&'a [BatchRecord]> {
        records.chunks(self.batch_size).collect()
    }

    /// Number of batches `plan` would produce for `n` records
    pub fn batch_count(&self, n: usize) -> usize {
        n.div_ceil(self.batch_size)
    }

    /// Merge-write every record into `collection`, one batch at a time.
    ///
    /// The collection id is checked before anything is written.
    /// Stops at the first failed batch; earlier batches stay committed.
    /// Rerunning the same input is safe since keys are deterministic and
    /// writes merge.
    pub async fn load<S>(&self, store: &S, collection: &str, records: Vec<BatchRecord>) -> Result<LoadReport>
    where
        S: DocumentStore + ?Sized,
    {
        validate_collection_id(collection)?;
        let records = dedupe_by_key(records);
        let batches = self.plan(&records);
        let total = batches.len();
        let mut committed = 0usize;

        info!(
            collection,
            records = records.len(),
            batches = total,
            batch_size = self.batch_size,
            "Starting load"
        );

        for (index, batch) in batches.into_iter().enumerate() {
            let writes: Vec<DocumentWrite> = batch
                .iter()
                .map(|r| DocumentWrite::merge(collection, r.key.clone(), r.fields.clone()))
                .collect();

            store.commit(&writes).await.with_context(|| {
                format!(
                    "Batch {} of {} failed ({} records already committed); rerun the load",
                    index + 1,
                    total,
                    committed
                )
            })?;

            committed += batch.len();
            info!(batch = index + 1, of = total, size = batch.len(), "Batch committed");
        }

        Ok(LoadReport {
            collection: collection.to_string(),
            records: committed,
            batches: total,
        })
    }
}

/// Collapse repeated keys to the last occurrence, kept at the position of
/// the first. One commit may not write the same document twice.
fn dedupe_by_key(records: Vec<BatchRecord>) -> Vec<BatchRecord> {
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<BatchRecord> = Vec::with_capacity(records.len());

    for record in records {
        match position.get(&record.key) {
            Some(&i) => {
                warn!(key = %record.key, "Duplicate key in input, keeping last occurrence");
                out[i] = record;
            }
            None => {
                position.insert(record.key.clone(), out.len());
                out.push(record);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn records(n: usize) -> Vec<BatchRecord> {
        (0..n)
            .map(|i| {
                let mut fields = Map::new();
                fields.insert("n".into(), json!(i));
                BatchRecord::new(format!("doc-{}", i), fields).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_rejects_out_of_range_sizes() {
        assert!(BatchLoader::new(0).is_err());
        assert!(BatchLoader::new(501).is_err());
        assert!(BatchLoader::new(500).is_ok());
    }

    #[test]
    fn test_plan_sizes() {
        for (n, size) in [(0, 100), (1, 100), (100, 100), (101, 100), (1234, 400), (7, 3)] {
            let loader = BatchLoader::new(size).unwrap();
            let recs = records(n);
            let plan = loader.plan(&recs);

            assert_eq!(plan.len(), n.div_ceil(size), "n={} size={}", n, size);
            assert_eq!(plan.len(), loader.batch_count(n));
            assert!(plan.iter().all(|b| !b.is_empty() && b.len() <= size));
            assert_eq!(plan.iter().map(|b| b.len()).sum::<usize>(), n);
        }
    }

    #[test]
    fn test_dedupe_keeps_last_at_first_position() {
        let mut recs = records(3);
        let mut fields = Map::new();
        fields.insert("n".into(), json!("replacement"));
        recs.push(BatchRecord::new("doc-0", fields).unwrap());

        let out = dedupe_by_key(recs);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].key, "doc-0");
        assert_eq!(out[0].fields["n"], "replacement");
        assert_eq!(out[1].key, "doc-1");
    }
}
