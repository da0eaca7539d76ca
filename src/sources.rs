//! Gathering raw document fields from the records that may hold them.
//!
//! Depending on which onboarding flow wrote it, the same document can sit in
//! several places: a user's nested `kyc` field, or the separate verification
//! record. Each record layout has, per slot, a fixed list of JSON pointers
//! that is searched in order. Sets gathered from different records are
//! combined with [`crate::merge::merge_document_sets`].

use serde_json::Value;
use tracing::trace;

use crate::extraction::extract_reference;
use crate::types::{DocumentSlot, RawDocumentSet};

const ID_FRONT_POINTERS: &[&str] = &[
    "/details/documents/idFront",
    "/documents/idFront",
    "/details/idFrontUrl",
    "/idFrontUrl",
    "/idFront",
    "/details/id_documents/idFront",
    "/details/id_documents/front",
];

const ID_BACK_POINTERS: &[&str] = &[
    "/details/documents/idBack",
    "/documents/idBack",
    "/details/idBackUrl",
    "/idBackUrl",
    "/idBack",
    "/details/id_documents/idBack",
    "/details/id_documents/back",
];

const SELFIE_POINTERS: &[&str] = &[
    "/details/documents/selfie",
    "/documents/selfie",
    "/details/selfieUrl",
    "/selfieUrl",
    "/selfie",
    "/details/selfie_liveness/selfie",
    "/details/selfie_liveness/selfieImage",
];

const PROOF_OF_ADDRESS_POINTERS: &[&str] = &[
    "/details/documents/proofOfAddress",
    "/documents/proofOfAddress",
    "/details/addressProofUrl",
    "/addressProofUrl",
    "/proofOfAddress",
    "/details/proof_of_address/proofOfAddress",
    "/details/proof_of_address/proof_of_address",
    "/details/proof_of_address/address",
];

const ADDITIONAL_DOCS_POINTERS: &[&str] = &[
    "/details/documents/additionalDocs",
    "/documents/additionalDocs",
    "/additionalDocs",
];

const VERIFICATION_ID_FRONT_POINTERS: &[&str] =
    &["/kyc_id_image_url", "/idFront", "/documents/idFront"];

const VERIFICATION_ID_BACK_POINTERS: &[&str] = &["/idBack", "/documents/idBack"];

const VERIFICATION_SELFIE_POINTERS: &[&str] =
    &["/kyc_selfie_url", "/selfie", "/documents/selfie"];

const VERIFICATION_PROOF_OF_ADDRESS_POINTERS: &[&str] = &[
    "/proofOfAddress",
    "/addressProofUrl",
    "/documents/proofOfAddress",
];

const VERIFICATION_ADDITIONAL_DOCS_POINTERS: &[&str] =
    &["/additionalDocs", "/documents/additionalDocs"];

/// The JSON pointers searched for `slot` in a user's `kyc` field, in
/// precedence order.
pub fn slot_pointers(slot: DocumentSlot) -> &'static [&'static str] {
    match slot {
        DocumentSlot::IdFront => ID_FRONT_POINTERS,
        DocumentSlot::IdBack => ID_BACK_POINTERS,
        DocumentSlot::Selfie => SELFIE_POINTERS,
        DocumentSlot::ProofOfAddress => PROOF_OF_ADDRESS_POINTERS,
    }
}

/// The JSON pointers searched for `slot` in a verification record, in
/// precedence order.
pub fn verification_slot_pointers(slot: DocumentSlot) -> &'static [&'static str] {
    match slot {
        DocumentSlot::IdFront => VERIFICATION_ID_FRONT_POINTERS,
        DocumentSlot::IdBack => VERIFICATION_ID_BACK_POINTERS,
        DocumentSlot::Selfie => VERIFICATION_SELFIE_POINTERS,
        DocumentSlot::ProofOfAddress => VERIFICATION_PROOF_OF_ADDRESS_POINTERS,
    }
}

/// Builds a raw document set from a user's `kyc` field.
///
/// For each slot the first location whose value yields a candidate is kept,
/// still in its stored shape so that resolution sees the original value.
/// `additionalDocs` comes from the first location holding an array.
pub fn gather_kyc_documents(kyc: &Value) -> RawDocumentSet {
    gather(kyc, slot_pointers, ADDITIONAL_DOCS_POINTERS)
}

/// Builds a raw document set from a verification record, with the same
/// first-usable rule as [`gather_kyc_documents`].
pub fn gather_verification_documents(verification: &Value) -> RawDocumentSet {
    gather(
        verification,
        verification_slot_pointers,
        VERIFICATION_ADDITIONAL_DOCS_POINTERS,
    )
}

fn gather(
    record: &Value,
    pointers_for: fn(DocumentSlot) -> &'static [&'static str],
    additional_pointers: &[&str],
) -> RawDocumentSet {
    let mut raw = RawDocumentSet::default();
    for slot in DocumentSlot::ALL {
        if let Some(value) = first_usable(record, pointers_for(slot)) {
            raw.set(slot, value.clone());
        }
    }
    if let Some(list) = additional_pointers
        .iter()
        .filter_map(|pointer| record.pointer(pointer))
        .find(|value| value.is_array())
    {
        raw.additional_docs = list.clone();
    }
    raw
}

fn first_usable<'a>(record: &'a Value, pointers: &[&str]) -> Option<&'a Value> {
    pointers.iter().find_map(|pointer| {
        let value = record.pointer(pointer)?;
        if extract_reference(value).is_some() {
            trace!(pointer, "found document reference");
            Some(value)
        } else {
            None
        }
    })
}
