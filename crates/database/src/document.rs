//! JSON document columns.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Result;

/// Decode an optional JSON column.
pub(crate) fn decode_opt<T: DeserializeOwned>(raw: Option<String>) -> Result<Option<T>> {
    match raw {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Decode a JSON list column. Blank text reads as an empty list.
pub(crate) fn decode_list<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(raw)?)
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}
