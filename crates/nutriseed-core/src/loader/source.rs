//! Reading seed files from disk.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use super::record::{BatchRecord, SeedKind};
use crate::api::ApiError;

/// Read a JSON seed file into records.
///
/// Two shapes are accepted:
/// - an array of objects; keys follow the kind's derivation rule
/// - an object of `key -> object`; the map key is the document key
pub fn read_records(path: &Path, kind: SeedKind) -> Result<Vec<BatchRecord>> {
    if !path.exists() {
        return Err(ApiError::Config(format!("seed file {} does not exist", path.display())).into());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| ApiError::InvalidRecord(format!("{} is not valid JSON: {}", path.display(), e)))?;

    let records = records_from_value(value, kind)
        .with_context(|| format!("Failed to read {} from {}", kind, path.display()))?;
    debug!(path = %path.display(), count = records.len(), "Read seed file");
    Ok(records)
}

pub fn records_from_value(value: Value, kind: SeedKind) -> Result<Vec<BatchRecord>, ApiError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                BatchRecord::derive(kind, item).map_err(|e| match e {
                    ApiError::InvalidRecord(why) => ApiError::InvalidRecord(format!("entry {}: {}", i, why)),
                    other => other,
                })
            })
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .map(|(key, item)| match item {
                Value::Object(fields) => BatchRecord::new(key, fields),
                _ => Err(ApiError::InvalidRecord(format!("entry {:?} is not an object", key))),
            })
            .collect(),
        _ => Err(ApiError::InvalidRecord(
            "seed file must contain an array or an object of records".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_array_shape() {
        let records = records_from_value(
            json!([{"name": "Lunge", "sets": 3}, {"id": "ex-9", "name": "Plank"}]),
            SeedKind::Exercises,
        )
        .unwrap();
        let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["lunge", "ex-9"]);
    }

    #[test]
    fn test_keyed_object_shape() {
        let records = records_from_value(
            json!({"week-1": {"name": "Cut"}, "week-2": {"name": "Bulk"}}),
            SeedKind::Menus,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.key == "week-2" && r.fields["name"] == "Bulk"));
    }

    #[test]
    fn test_bad_entry_names_its_index() {
        let err = records_from_value(json!([{"name": "Ok"}, 7]), SeedKind::Exercises).unwrap_err();
        assert!(err.to_string().contains("entry 1"));
    }

    #[test]
    fn test_scalar_top_level_is_rejected() {
        assert!(records_from_value(json!("nope"), SeedKind::Forms).is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = read_records(Path::new("/definitely/not/here.json"), SeedKind::Forms).unwrap_err();
        assert!(ApiError::find(&err).is_some_and(ApiError::is_config));
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"title": "PAR-Q"}}, {{"title": "Goals"}}]"#).unwrap();

        let records = read_records(file.path(), SeedKind::Forms).unwrap();
        assert_eq!(records[0].key, "par-q");
        assert_eq!(records[1].key, "goals");
    }

    #[test]
    fn test_invalid_json_is_data_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = read_records(file.path(), SeedKind::Menus).unwrap_err();
        assert!(matches!(ApiError::find(&err), Some(ApiError::InvalidRecord(_))));
    }
}
