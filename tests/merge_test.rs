use docref::merge::*;
use docref::types::NormalizedDocumentSet;

fn set(id_front: Option<&str>, id_back: Option<&str>, extra: &[&str]) -> NormalizedDocumentSet {
    NormalizedDocumentSet {
        id_front: id_front.map(str::to_string),
        id_back: id_back.map(str::to_string),
        additional_docs: extra.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn test_primary_wins_per_slot() {
    let primary = set(Some("A"), None, &[]);
    let secondary = set(Some("B"), Some("C"), &[]);
    let merged = merge_document_sets(&primary, &secondary);
    assert_eq!(merged.id_front.as_deref(), Some("A"));
    assert_eq!(merged.id_back.as_deref(), Some("C"));
    assert_eq!(merged.selfie, None);
    assert_eq!(merged.proof_of_address, None);
}

#[test]
fn test_blank_primary_slot_does_not_shadow_secondary() {
    let primary = set(Some("  "), None, &[]);
    let secondary = set(Some("B"), None, &[]);
    assert_eq!(
        merge_document_sets(&primary, &secondary).id_front.as_deref(),
        Some("B")
    );
}

#[test]
fn test_additional_docs_taken_whole() {
    let primary = set(None, None, &["p1"]);
    let secondary = set(None, None, &["s1", "s2"]);
    assert_eq!(
        merge_document_sets(&primary, &secondary).additional_docs,
        vec!["p1"]
    );
    assert_eq!(
        merge_document_sets(&set(None, None, &[]), &secondary).additional_docs,
        vec!["s1", "s2"]
    );
}

#[test]
fn test_merge_with_empty_sets() {
    let only = set(Some("A"), Some("B"), &["x"]);
    let empty = NormalizedDocumentSet::default();
    assert_eq!(merge_document_sets(&only, &empty), only);
    assert_eq!(merge_document_sets(&empty, &only), only);
}

#[test]
fn test_merge_all_prefers_earlier_sets() {
    let merged = merge_all(&[
        set(None, Some("B1"), &[]),
        set(Some("A2"), Some("B2"), &[]),
        set(Some("A3"), None, &["x3"]),
    ]);
    assert_eq!(merged.id_front.as_deref(), Some("A2"));
    assert_eq!(merged.id_back.as_deref(), Some("B1"));
    assert_eq!(merged.additional_docs, vec!["x3"]);
    assert!(merge_all(&[]).is_empty());
}
