use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::api::ApiError;
use crate::store::validate_document_key;
use crate::utils::slugify;

/// What is being seeded. Decides collection, batch size and key rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    Exercises,
    Menus,
    Forms,
}

impl SeedKind {
    pub const ALL: [SeedKind; 3] = [SeedKind::Exercises, SeedKind::Menus, SeedKind::Forms];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeedKind::Exercises => "exercises",
            SeedKind::Menus => "menus",
            SeedKind::Forms => "forms",
        }
    }

    pub fn default_collection(&self) -> &'static str {
        self.as_str()
    }

    /// Per-kind batch sizes. They differ for historical reasons and are only
    /// defaults; callers may override them.
    pub fn default_batch_size(&self) -> usize {
        match self {
            SeedKind::Exercises => 400,
            SeedKind::Menus | SeedKind::Forms => 100,
        }
    }

    /// Field whose slug becomes the key when no `id` is present
    pub fn name_field(&self) -> &'static str {
        match self {
            SeedKind::Exercises | SeedKind::Menus => "name",
            SeedKind::Forms => "title",
        }
    }

    /// Derive the document key for one entry.
    pub fn derive_key(&self, fields: &Map<String, Value>) -> Result<String, ApiError> {
        let key = match fields.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
            Some(Value::Null) | None => self.key_from_name(fields)?,
            Some(other) => {
                return Err(ApiError::InvalidRecord(format!(
                    "unusable id {} in {} record",
                    other,
                    self.as_str()
                )))
            }
        };
        validate_document_key(&key)?;
        Ok(key)
    }

    fn key_from_name(&self, fields: &Map<String, Value>) -> Result<String, ApiError> {
        let field = self.name_field();
        let name = fields.get(field).and_then(Value::as_str).ok_or_else(|| {
            ApiError::InvalidRecord(format!(
                "{} record has neither an id nor a string {:?}",
                self.as_str(),
                field
            ))
        })?;
        let slug = slugify(name);
        if slug.is_empty() {
            return Err(ApiError::InvalidRecord(format!(
                "{} {:?} does not produce a usable key",
                field, name
            )));
        }
        Ok(slug)
    }
}

impl fmt::Display for SeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeedKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        SeedKind::ALL
            .into_iter()
            .find(|k| k.as_str() == lower || k.as_str().trim_end_matches('s') == lower)
            .ok_or_else(|| {
                ApiError::Config(format!(
                    "unknown seed kind {:?} (expected exercises, menus or forms)",
                    s
                ))
            })
    }
}

/// One document to be written by the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRecord {
    pub key: String,
    pub fields: Map<String, Value>,
}

impl BatchRecord {
    /// Build a record with an explicit key
    pub fn new(key: impl Into<String>, fields: Map<String, Value>) -> Result<Self, ApiError> {
        let key = key.into();
        validate_document_key(&key)?;
        Ok(Self { key, fields })
    }

    /// Build a record whose key follows the kind's derivation rule
    pub fn derive(kind: SeedKind, value: Value) -> Result<Self, ApiError> {
        let fields = match value {
            Value::Object(map) => map,
            other => {
                return Err(ApiError::InvalidRecord(format!(
                    "{} entry is not an object: {}",
                    kind,
                    ApiError::truncate_body(&other.to_string())
                )))
            }
        };
        let key = kind.derive_key(&fields)?;
        Ok(Self { key, fields })
    }
}
