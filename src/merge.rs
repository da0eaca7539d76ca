//! Merging document sets assembled from more than one stored record.

use crate::types::{DocumentSlot, NormalizedDocumentSet};

/// Merges two normalized sets slot by slot.
///
/// Each scalar slot takes the primary value when present and falls back to
/// the secondary one otherwise. `additional_docs` is taken whole from the
/// primary set unless it is empty.
pub fn merge_document_sets(
    primary: &NormalizedDocumentSet,
    secondary: &NormalizedDocumentSet,
) -> NormalizedDocumentSet {
    let mut merged = NormalizedDocumentSet::default();
    for slot in DocumentSlot::ALL {
        let value = provided(primary.get(slot)).or_else(|| provided(secondary.get(slot)));
        merged.set(slot, value.map(str::to_string));
    }
    merged.additional_docs = if primary.additional_docs.is_empty() {
        secondary.additional_docs.clone()
    } else {
        primary.additional_docs.clone()
    };
    merged.sanitize()
}

fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Merges any number of sets; earlier sets take precedence.
pub fn merge_all(sets: &[NormalizedDocumentSet]) -> NormalizedDocumentSet {
    sets.iter()
        .fold(NormalizedDocumentSet::default(), |acc, next| {
            merge_document_sets(&acc, next)
        })
}
