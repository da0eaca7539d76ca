use serde_json::{Map, Value};

use super::looks_like_reference;
use crate::types::{ReferenceKey, StoredReference};

/// Decodes a stored field value into a [`StoredReference`].
///
/// Object checks run in a fixed order:
/// 1. timestamp shape (`toDate`, numeric `seconds` or `_seconds`)
/// 2. `downloadURL`, then `url`, then `path`
/// 3. an object under `value`, decoded with this same procedure
/// 4. a serialized storage handle (`_delegate._location.path_` or
///    `_location.path_`)
/// 5. the first string field that looks like a URL or storage path
///
/// Timestamps are rejected before any key is read so that their internal
/// fields are never mistaken for a reference.
pub fn decode_reference(raw: &Value) -> StoredReference {
    match raw {
        Value::Null => StoredReference::Absent,
        Value::String(s) => match non_blank(s) {
            Some(trimmed) => StoredReference::Literal(trimmed),
            None => StoredReference::Absent,
        },
        Value::Object(map) => decode_object(map),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) => StoredReference::Unrecognized,
    }
}

fn decode_object(map: &Map<String, Value>) -> StoredReference {
    if is_timestamp(map) {
        return StoredReference::Timestamp;
    }

    for key in ReferenceKey::PRIORITY {
        if let Some(value) = map.get(key.as_str()).and_then(Value::as_str).and_then(non_blank) {
            return StoredReference::Keyed { key, value };
        }
    }

    // Recursion depth is bounded by serde_json's parse depth limit.
    if let Some(inner) = map.get("value").filter(|v| v.is_object()) {
        return StoredReference::Nested(Box::new(decode_reference(inner)));
    }

    if let Some(path) = storage_handle_path(map) {
        return StoredReference::StorageHandle(path);
    }

    // The prefix test runs on the stored value, before trimming.
    for (field, value) in map {
        let Some(stored) = value.as_str().filter(|s| looks_like_reference(s)) else {
            continue;
        };
        if let Some(trimmed) = non_blank(stored) {
            return StoredReference::Heuristic {
                field: field.clone(),
                value: trimmed,
            };
        }
    }

    StoredReference::Unrecognized
}

/// A stored timestamp, as written by the document store's client SDKs or
/// its admin serializer.
fn is_timestamp(map: &Map<String, Value>) -> bool {
    let has_to_date = map.get("toDate").is_some_and(|v| !v.is_null());
    let numeric = |key: &str| map.get(key).is_some_and(Value::is_number);
    has_to_date || numeric("seconds") || numeric("_seconds")
}

fn storage_handle_path(map: &Map<String, Value>) -> Option<String> {
    let location = map
        .get("_delegate")
        .and_then(|delegate| delegate.get("_location"))
        .or_else(|| map.get("_location"))?;
    location
        .get("path_")
        .and_then(Value::as_str)
        .and_then(non_blank)
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
