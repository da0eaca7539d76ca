use serde_json::Value;
use tracing::{debug, warn};

use super::PathResolver;
use crate::errors::LookupError;
use crate::extraction::{extract_reference, STORAGE_PATH_PREFIXES};
use crate::types::CandidateKind;

/// Legacy upload prefix whose objects have since moved.
const LEGACY_KYC_PREFIX: &str = "uploads/kyc/";

/// Prefixes tried in place of [`LEGACY_KYC_PREFIX`], in order.
const LEGACY_KYC_REWRITES: [&str; 2] = ["kyc-documents/", "kyc/"];

/// Outcome of walking the candidate path list.
enum Attempt {
    Resolved(String),
    Absent,
    Failed(LookupError),
}

/// Resolves candidate references into absolute URLs through an injected
/// [`PathResolver`].
///
/// Holds no mutable state; every call is independent.
pub struct ReferenceResolver<R> {
    lookup: R,
}

impl<R: PathResolver> ReferenceResolver<R> {
    pub fn new(lookup: R) -> Self {
        Self { lookup }
    }

    /// The object-store lookup this resolver was built with.
    pub fn lookup(&self) -> &R {
        &self.lookup
    }

    /// Resolves a single candidate.
    ///
    /// - `None` or blank: `None`.
    /// - Already `https://`: returned unchanged, no lookup.
    /// - A storage path: looked up as-is, then through the legacy rewrites.
    ///   The first URL found wins. If every attempt reports absence the
    ///   result is `None`. Any other failure returns the candidate unchanged.
    /// - Anything else: returned unchanged.
    pub async fn resolve_reference(&self, candidate: Option<&str>) -> Option<String> {
        let candidate = candidate?.trim();
        if candidate.is_empty() {
            return None;
        }

        match classify_candidate(candidate) {
            CandidateKind::Absolute | CandidateKind::Opaque => Some(candidate.to_string()),
            CandidateKind::StoragePath => self.resolve_storage_path(candidate).await,
        }
    }

    /// Extracts a candidate from a stored field value and resolves it.
    pub async fn resolve_value(&self, raw: &Value) -> Option<String> {
        let candidate = extract_reference(raw);
        self.resolve_reference(candidate.as_deref()).await
    }

    async fn resolve_storage_path(&self, candidate: &str) -> Option<String> {
        let paths = candidate_paths(candidate);
        if paths.is_empty() {
            debug!(candidate, "candidate has no object path after stripping slashes");
            return None;
        }

        match self.first_resolved(&paths).await {
            Attempt::Resolved(url) => Some(url),
            Attempt::Absent => {
                debug!(candidate, tried = ?paths, "no object found at any candidate path");
                None
            }
            Attempt::Failed(err) => {
                warn!(candidate, error = %err, "lookup failed, keeping unresolved reference");
                Some(candidate.to_string())
            }
        }
    }

    /// Tries each path strictly in order, stopping at the first URL or the
    /// first failure that is not a confirmed absence.
    async fn first_resolved(&self, paths: &[String]) -> Attempt {
        for path in paths {
            match self.lookup.resolve_path(path).await {
                Ok(url) if url.starts_with("https://") => {
                    debug!(path = %path, "resolved storage path");
                    return Attempt::Resolved(url);
                }
                Ok(url) => {
                    return Attempt::Failed(LookupError::Other {
                        path: path.clone(),
                        message: format!("lookup returned a non-https url: {url}"),
                    });
                }
                Err(err) if err.is_absence() => {
                    debug!(path = %path, error = %err, "candidate path unavailable");
                }
                Err(err) => return Attempt::Failed(err),
            }
        }
        Attempt::Absent
    }
}

/// Classifies a trimmed candidate string.
pub fn classify_candidate(candidate: &str) -> CandidateKind {
    if candidate.starts_with("https://") {
        return CandidateKind::Absolute;
    }
    let known_prefix = STORAGE_PATH_PREFIXES
        .iter()
        .any(|prefix| candidate.starts_with(prefix));
    if known_prefix || (candidate.contains('/') && !candidate.starts_with("http")) {
        CandidateKind::StoragePath
    } else {
        CandidateKind::Opaque
    }
}

/// Returns the object paths to try for a storage-path candidate, in order.
///
/// Leading slashes are stripped. Paths under `uploads/kyc/` are followed by
/// the same path under `kyc-documents/` and then `kyc/`. An empty path
/// yields an empty list.
pub fn candidate_paths(candidate: &str) -> Vec<String> {
    let path = candidate.trim_start_matches('/');
    if path.is_empty() {
        return Vec::new();
    }

    let mut paths = vec![path.to_string()];
    if let Some(rest) = path.strip_prefix(LEGACY_KYC_PREFIX) {
        paths.extend(
            LEGACY_KYC_REWRITES
                .iter()
                .map(|prefix| format!("{prefix}{rest}")),
        );
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_paths_plain() {
        assert_eq!(candidate_paths("kyc/u1/a.png"), vec!["kyc/u1/a.png"]);
    }

    #[test]
    fn test_candidate_paths_legacy_prefix() {
        assert_eq!(
            candidate_paths("//uploads/kyc/u1/a.png"),
            vec![
                "uploads/kyc/u1/a.png",
                "kyc-documents/u1/a.png",
                "kyc/u1/a.png"
            ]
        );
    }

    #[test]
    fn test_candidate_paths_only_slashes() {
        assert!(candidate_paths("///").is_empty());
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify_candidate("https://cdn/x.png"), CandidateKind::Absolute);
        assert_eq!(classify_candidate("uploads/a.png"), CandidateKind::StoragePath);
        assert_eq!(classify_candidate("users/u1/a.png"), CandidateKind::StoragePath);
        assert_eq!(classify_candidate("/kyc/a.png"), CandidateKind::StoragePath);
        assert_eq!(classify_candidate("http://cdn/x.png"), CandidateKind::Opaque);
        assert_eq!(classify_candidate("selfie.png"), CandidateKind::Opaque);
    }
}
