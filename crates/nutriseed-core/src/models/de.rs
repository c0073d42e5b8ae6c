//! Deserialization helpers for loosely-typed API payloads.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Accept `[..]`, a single object, or a missing/null field as a list.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<OneOrMany<T>> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
}

fn to_f64<E: de::Error>(value: NumberLike) -> Result<f64, E> {
    match value {
        NumberLike::Number(n) => Ok(n),
        NumberLike::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("expected a number, got {:?}", s))),
    }
}

/// Numbers that arrive either as JSON numbers or as strings.
pub fn number_from_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    to_f64(NumberLike::deserialize(deserializer)?)
}

pub fn opt_number_from_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberLike>::deserialize(deserializer)? {
        Some(NumberLike::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => to_f64(value).map(Some),
        None => Ok(None),
    }
}

pub fn u32_from_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = number_from_string(deserializer)?;
    if n < 0.0 || n.fract() != 0.0 || n > u32::MAX as f64 {
        return Err(de::Error::custom(format!("expected an unsigned integer, got {}", n)));
    }
    Ok(n as u32)
}

/// Ids that arrive either as strings or as bare integers.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Int(i64),
        Text(String),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Int(n) => n.to_string(),
        Id::Text(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "one_or_many")]
        items: Vec<u8>,
        #[serde(default, deserialize_with = "opt_number_from_string")]
        amount: Option<f64>,
    }

    #[test]
    fn test_one_or_many_shapes() {
        let h: Holder = serde_json::from_str(r#"{"items": [1, 2]}"#).unwrap();
        assert_eq!(h.items, vec![1, 2]);
        let h: Holder = serde_json::from_str(r#"{"items": 7}"#).unwrap();
        assert_eq!(h.items, vec![7]);
        let h: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert!(h.items.is_empty());
    }

    #[test]
    fn test_opt_number_from_string() {
        let h: Holder = serde_json::from_str(r#"{"amount": "12.50"}"#).unwrap();
        assert_eq!(h.amount, Some(12.5));
        let h: Holder = serde_json::from_str(r#"{"amount": 3}"#).unwrap();
        assert_eq!(h.amount, Some(3.0));
        let h: Holder = serde_json::from_str(r#"{"amount": ""}"#).unwrap();
        assert_eq!(h.amount, None);
        assert!(serde_json::from_str::<Holder>(r#"{"amount": "n/a"}"#).is_err());
    }
}
