/// Reference resolution module.
///
/// Turns extracted candidates into absolute download URLs by asking the
/// object store, walking a fixed list of fallback paths when a stored path
/// has gone stale.
mod resolver;

pub use resolver::{candidate_paths, classify_candidate, ReferenceResolver};

use async_trait::async_trait;

use crate::errors::LookupError;

/// Capability for turning an object-store path into an absolute URL.
///
/// Implementations are expected to apply their own timeout and report it as
/// [`LookupError::Other`].
#[async_trait]
pub trait PathResolver: Send + Sync {
    /// Resolves `path` to an absolute download URL.
    async fn resolve_path(&self, path: &str) -> Result<String, LookupError>;
}
