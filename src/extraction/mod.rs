/// Reference extraction module.
///
/// Turns whatever a document field happens to hold into a plain candidate
/// string, without touching the object store.
mod decoder;

pub use decoder::decode_reference;

use serde_json::Value;
use tracing::trace;

/// Prefixes that mark a string as a relative object-store path.
pub const STORAGE_PATH_PREFIXES: [&str; 3] = ["uploads/", "kyc/", "kyc-documents/"];

/// Returns `true` if `value` looks like a URL or a known storage path.
///
/// Used for the last-resort scan over arbitrary object fields.
pub fn looks_like_reference(value: &str) -> bool {
    value.starts_with("http")
        || STORAGE_PATH_PREFIXES
            .iter()
            .any(|prefix| value.starts_with(prefix))
}

/// Extracts a candidate reference from a stored field value.
///
/// Returns the trimmed, non-empty string the value carries, or `None` when
/// it holds nothing usable. Never performs I/O.
pub fn extract_reference(raw: &Value) -> Option<String> {
    let decoded = decode_reference(raw);
    trace!(kind = decoded.kind(), "decoded stored reference");
    decoded.candidate()
}

/// Extracts every usable reference from a list field.
///
/// Elements without a usable reference are dropped; the survivors keep their
/// input order. A non-array value yields an empty list.
pub fn extract_references(raw: &Value) -> Vec<String> {
    match raw.as_array() {
        Some(items) => items.iter().filter_map(extract_reference).collect(),
        None => Vec::new(),
    }
}
