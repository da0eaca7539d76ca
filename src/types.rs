use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The fixed document slots of a KYC record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentSlot {
    IdFront,
    IdBack,
    Selfie,
    ProofOfAddress,
}

#[allow(clippy::should_implement_trait)]
impl DocumentSlot {
    /// Every scalar slot, in record order.
    pub const ALL: [DocumentSlot; 4] = [
        DocumentSlot::IdFront,
        DocumentSlot::IdBack,
        DocumentSlot::Selfie,
        DocumentSlot::ProofOfAddress,
    ];

    /// Returns the field name used for this slot in stored records.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentSlot::IdFront => "idFront",
            DocumentSlot::IdBack => "idBack",
            DocumentSlot::Selfie => "selfie",
            DocumentSlot::ProofOfAddress => "proofOfAddress",
        }
    }

    /// Parses a stored field name into a `DocumentSlot`, returning `None` for
    /// unrecognized values.
    pub fn from_str(s: &str) -> Option<DocumentSlot> {
        match s {
            "idFront" => Some(DocumentSlot::IdFront),
            "idBack" => Some(DocumentSlot::IdBack),
            "selfie" => Some(DocumentSlot::Selfie),
            "proofOfAddress" => Some(DocumentSlot::ProofOfAddress),
            _ => None,
        }
    }
}

/// Well-known keys that carry a reference inside a wrapper object, in
/// priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKey {
    DownloadUrl,
    Url,
    Path,
}

impl ReferenceKey {
    pub const PRIORITY: [ReferenceKey; 3] =
        [ReferenceKey::DownloadUrl, ReferenceKey::Url, ReferenceKey::Path];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKey::DownloadUrl => "downloadURL",
            ReferenceKey::Url => "url",
            ReferenceKey::Path => "path",
        }
    }
}

/// A stored field value decoded into one of the shapes a document reference
/// can take.
///
/// Every variant that carries a string carries it trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredReference {
    /// `null`, missing, or a blank string.
    Absent,
    /// A plain string: absolute URL, storage path, or anything else.
    Literal(String),
    /// An object carrying the reference under a well-known key.
    Keyed { key: ReferenceKey, value: String },
    /// An object wrapping another reference under `value`.
    Nested(Box<StoredReference>),
    /// A serialized storage-reference handle.
    StorageHandle(String),
    /// A timestamp stored where a document was expected.
    Timestamp,
    /// An object with some other string field that looks like a URL or path.
    Heuristic { field: String, value: String },
    /// Anything else: numbers, booleans, arrays, objects with nothing usable.
    Unrecognized,
}

impl StoredReference {
    /// Returns the candidate string this reference carries, if any.
    pub fn candidate(&self) -> Option<String> {
        match self {
            StoredReference::Literal(value)
            | StoredReference::Keyed { value, .. }
            | StoredReference::StorageHandle(value)
            | StoredReference::Heuristic { value, .. } => Some(value.clone()),
            StoredReference::Nested(inner) => inner.candidate(),
            StoredReference::Absent
            | StoredReference::Timestamp
            | StoredReference::Unrecognized => None,
        }
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            StoredReference::Absent => "absent",
            StoredReference::Literal(_) => "literal",
            StoredReference::Keyed { .. } => "keyed",
            StoredReference::Nested(_) => "nested",
            StoredReference::StorageHandle(_) => "storage_handle",
            StoredReference::Timestamp => "timestamp",
            StoredReference::Heuristic { .. } => "heuristic",
            StoredReference::Unrecognized => "unrecognized",
        }
    }
}

/// How a candidate string should be treated by remote resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// Already an `https://` URL.
    Absolute,
    /// A relative object-store path that needs a lookup.
    StoragePath,
    /// Neither; passed through untouched.
    Opaque,
}

/// The document fields of a stored KYC record, exactly as persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDocumentSet {
    pub id_front: Value,
    pub id_back: Value,
    pub selfie: Value,
    pub proof_of_address: Value,
    pub additional_docs: Value,
}

impl RawDocumentSet {
    /// Builds a raw set from an arbitrary `documents` value.
    ///
    /// Anything other than an object yields an empty set; unknown fields are
    /// ignored.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        let field = |name: &str| map.get(name).cloned().unwrap_or(Value::Null);
        Self {
            id_front: field(DocumentSlot::IdFront.as_str()),
            id_back: field(DocumentSlot::IdBack.as_str()),
            selfie: field(DocumentSlot::Selfie.as_str()),
            proof_of_address: field(DocumentSlot::ProofOfAddress.as_str()),
            additional_docs: field("additionalDocs"),
        }
    }

    pub fn get(&self, slot: DocumentSlot) -> &Value {
        match slot {
            DocumentSlot::IdFront => &self.id_front,
            DocumentSlot::IdBack => &self.id_back,
            DocumentSlot::Selfie => &self.selfie,
            DocumentSlot::ProofOfAddress => &self.proof_of_address,
        }
    }

    pub fn set(&mut self, slot: DocumentSlot, value: Value) {
        match slot {
            DocumentSlot::IdFront => self.id_front = value,
            DocumentSlot::IdBack => self.id_back = value,
            DocumentSlot::Selfie => self.selfie = value,
            DocumentSlot::ProofOfAddress => self.proof_of_address = value,
        }
    }
}

/// A document set after extraction and resolution.
///
/// Serializes with camelCase keys and explicit `null` for slots without a
/// usable reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizedDocumentSet {
    pub id_front: Option<String>,
    pub id_back: Option<String>,
    pub selfie: Option<String>,
    pub proof_of_address: Option<String>,
    pub additional_docs: Vec<String>,
}

impl NormalizedDocumentSet {
    pub fn get(&self, slot: DocumentSlot) -> Option<&str> {
        match slot {
            DocumentSlot::IdFront => self.id_front.as_deref(),
            DocumentSlot::IdBack => self.id_back.as_deref(),
            DocumentSlot::Selfie => self.selfie.as_deref(),
            DocumentSlot::ProofOfAddress => self.proof_of_address.as_deref(),
        }
    }

    pub fn set(&mut self, slot: DocumentSlot, value: Option<String>) {
        match slot {
            DocumentSlot::IdFront => self.id_front = value,
            DocumentSlot::IdBack => self.id_back = value,
            DocumentSlot::Selfie => self.selfie = value,
            DocumentSlot::ProofOfAddress => self.proof_of_address = value,
        }
    }

    /// Final clean-up pass: trims every value, turns blank scalar slots into
    /// `None` and drops blank entries from `additional_docs`.
    ///
    /// Every set handed out by this crate has been through this pass, so the
    /// slots only ever hold trimmed non-empty strings.
    pub fn sanitize(mut self) -> Self {
        for slot in DocumentSlot::ALL {
            let cleaned = clean(self.get(slot));
            self.set(slot, cleaned);
        }
        self.additional_docs = self
            .additional_docs
            .iter()
            .filter_map(|doc| clean(Some(doc.as_str())))
            .collect();
        self
    }

    /// Number of scalar slots holding a reference.
    pub fn provided_count(&self) -> usize {
        DocumentSlot::ALL
            .iter()
            .filter(|slot| self.get(**slot).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.provided_count() == 0 && self.additional_docs.is_empty()
    }
}

fn clean(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
