//! Document set normalization.
//!
//! Applies extraction and resolution to every slot of a stored KYC document
//! record.

use tracing::debug;

use crate::extraction::{extract_reference, extract_references};
use crate::resolution::{PathResolver, ReferenceResolver};
use crate::types::{NormalizedDocumentSet, RawDocumentSet};

/// Extracts every slot of a raw set without any remote resolution.
///
/// Storage paths are kept as stored; use
/// [`ReferenceResolver::normalize_document_set`] to turn them into URLs.
pub fn extract_document_set(raw: &RawDocumentSet) -> NormalizedDocumentSet {
    NormalizedDocumentSet {
        id_front: extract_reference(&raw.id_front),
        id_back: extract_reference(&raw.id_back),
        selfie: extract_reference(&raw.selfie),
        proof_of_address: extract_reference(&raw.proof_of_address),
        additional_docs: extract_references(&raw.additional_docs),
    }
    .sanitize()
}

impl<R: PathResolver> ReferenceResolver<R> {
    /// Normalizes a raw document set.
    ///
    /// The four scalar slots are resolved concurrently on the current task.
    /// `additionalDocs` entries are resolved in input order and entries
    /// without a usable reference are dropped. The result has been through
    /// [`NormalizedDocumentSet::sanitize`].
    pub async fn normalize_document_set(&self, raw: &RawDocumentSet) -> NormalizedDocumentSet {
        let (id_front, id_back, selfie, proof_of_address) = tokio::join!(
            self.resolve_value(&raw.id_front),
            self.resolve_value(&raw.id_back),
            self.resolve_value(&raw.selfie),
            self.resolve_value(&raw.proof_of_address),
        );

        let mut additional_docs = Vec::new();
        if let Some(items) = raw.additional_docs.as_array() {
            for item in items {
                let candidate = extract_reference(item);
                if let Some(url) = self.resolve_reference(candidate.as_deref()).await {
                    additional_docs.push(url);
                }
            }
        }

        let normalized = NormalizedDocumentSet {
            id_front,
            id_back,
            selfie,
            proof_of_address,
            additional_docs,
        }
        .sanitize();

        debug!(
            provided = normalized.provided_count(),
            additional = normalized.additional_docs.len(),
            "normalized document set"
        );
        normalized
    }
}
