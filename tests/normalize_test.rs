mod common;

use common::FakeStore;
use docref::normalize::extract_document_set;
use docref::resolution::ReferenceResolver;
use docref::types::{DocumentSlot, NormalizedDocumentSet, RawDocumentSet};
use serde_json::json;

#[tokio::test]
async fn test_review_record_end_to_end() {
    let raw: RawDocumentSet = serde_json::from_value(json!({
        "idFront": { "downloadURL": "uploads/kyc/u1/front.png" },
        "idBack": null,
        "selfie": "https://cdn/x.png",
        "proofOfAddress": {}
    }))
    .unwrap();
    let store = FakeStore::new().with_url("kyc-documents/u1/front.png", "https://cdn/front.png");
    let resolver = ReferenceResolver::new(store);

    let normalized = resolver.normalize_document_set(&raw).await;

    assert_eq!(
        normalized,
        NormalizedDocumentSet {
            id_front: Some("https://cdn/front.png".to_string()),
            id_back: None,
            selfie: Some("https://cdn/x.png".to_string()),
            proof_of_address: None,
            additional_docs: vec![],
        }
    );
    assert_eq!(
        serde_json::to_value(&normalized).unwrap(),
        json!({
            "idFront": "https://cdn/front.png",
            "idBack": null,
            "selfie": "https://cdn/x.png",
            "proofOfAddress": null,
            "additionalDocs": []
        })
    );
}

#[tokio::test]
async fn test_additional_docs_keep_order_and_drop_missing() {
    let raw = RawDocumentSet::from_value(&json!({
        "additionalDocs": [
            "kyc/u1/missing.png",
            { "url": "https://cdn/1.png" },
            { "seconds": 10 },
            "kyc/u1/two.png",
            7,
            "uploads/kyc/u1/three.png"
        ]
    }));
    let store = FakeStore::new()
        .with_url("kyc/u1/two.png", "https://cdn/2.png")
        .with_url("kyc/u1/three.png", "https://cdn/3.png");
    let resolver = ReferenceResolver::new(store);

    let normalized = resolver.normalize_document_set(&raw).await;

    assert_eq!(
        normalized.additional_docs,
        vec!["https://cdn/1.png", "https://cdn/2.png", "https://cdn/3.png"]
    );
}

#[tokio::test]
async fn test_non_array_additional_docs_is_empty() {
    let raw = RawDocumentSet::from_value(&json!({ "additionalDocs": "https://cdn/1.png" }));
    let resolver = ReferenceResolver::new(FakeStore::new());
    let normalized = resolver.normalize_document_set(&raw).await;
    assert!(normalized.additional_docs.is_empty());
}

#[tokio::test]
async fn test_every_slot_is_resolved() {
    let raw = RawDocumentSet::from_value(&json!({
        "idFront": "kyc/u1/front.png",
        "idBack": "kyc/u1/back.png",
        "selfie": "kyc/u1/selfie.png",
        "proofOfAddress": "kyc/u1/poa.pdf"
    }));
    let store = FakeStore::new()
        .with_url("kyc/u1/front.png", "https://cdn/front.png")
        .with_url("kyc/u1/back.png", "https://cdn/back.png")
        .with_url("kyc/u1/selfie.png", "https://cdn/selfie.png")
        .with_url("kyc/u1/poa.pdf", "https://cdn/poa.pdf");
    let resolver = ReferenceResolver::new(store);

    let normalized = resolver.normalize_document_set(&raw).await;

    assert_eq!(normalized.provided_count(), 4);
    assert_eq!(
        normalized.get(DocumentSlot::ProofOfAddress),
        Some("https://cdn/poa.pdf")
    );
    let mut calls = resolver.lookup().calls();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            "kyc/u1/back.png",
            "kyc/u1/front.png",
            "kyc/u1/poa.pdf",
            "kyc/u1/selfie.png"
        ]
    );
}

#[tokio::test]
async fn test_failing_store_keeps_candidates() {
    let raw = RawDocumentSet::from_value(&json!({ "selfie": { "path": "kyc/u1/s.png" } }));
    let store = FakeStore::new().with_failure("kyc/u1/s.png", "503 service unavailable");
    let resolver = ReferenceResolver::new(store);

    let normalized = resolver.normalize_document_set(&raw).await;
    assert_eq!(normalized.selfie.as_deref(), Some("kyc/u1/s.png"));
}

#[tokio::test]
async fn test_malformed_documents_value() {
    let resolver = ReferenceResolver::new(FakeStore::new());
    for documents in [json!(null), json!("https://cdn/x.png"), json!([1, 2]), json!(5)] {
        let raw = RawDocumentSet::from_value(&documents);
        let normalized = resolver.normalize_document_set(&raw).await;
        assert!(normalized.is_empty(), "input {}", documents);
    }
}

#[test]
fn test_extract_document_set_is_offline() {
    let raw = RawDocumentSet::from_value(&json!({
        "idFront": { "downloadURL": " uploads/kyc/u1/front.png " },
        "idBack": { "seconds": 1 },
        "selfie": 3,
        "additionalDocs": [" https://cdn/1.png ", null]
    }));
    let extracted = extract_document_set(&raw);
    assert_eq!(extracted.id_front.as_deref(), Some("uploads/kyc/u1/front.png"));
    assert_eq!(extracted.id_back, None);
    assert_eq!(extracted.selfie, None);
    assert_eq!(extracted.additional_docs, vec!["https://cdn/1.png"]);
}

#[test]
fn test_sanitize_cleans_blank_values() {
    let dirty = NormalizedDocumentSet {
        id_front: Some("  https://cdn/a.png ".to_string()),
        id_back: Some("   ".to_string()),
        selfie: Some(String::new()),
        proof_of_address: None,
        additional_docs: vec![" ".to_string(), "kyc/u1/x.png\n".to_string()],
    };
    let clean = dirty.sanitize();
    assert_eq!(clean.id_front.as_deref(), Some("https://cdn/a.png"));
    assert_eq!(clean.id_back, None);
    assert_eq!(clean.selfie, None);
    assert_eq!(clean.additional_docs, vec!["kyc/u1/x.png"]);
}
