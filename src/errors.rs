use thiserror::Error;

/// Errors that can occur while loading configuration or reading input records.
///
/// Resolution itself never surfaces these: every lookup failure is folded
/// into either `None` or a pass-through candidate.
#[derive(Error, Debug)]
pub enum DocRefError {
    #[error("config error: {message}")]
    Config { message: String },

    #[error("input error: {message} (path: {path})")]
    Input { message: String, path: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `DocRefError`.
pub type Result<T> = std::result::Result<T, DocRefError>;

/// Failure modes reported by an object-store path lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("object not found: {path}")]
    NotFound { path: String },

    #[error("not authorized to read object: {path}")]
    Unauthorized { path: String },

    #[error("lookup failed for {path}: {message}")]
    Other { path: String, message: String },
}

impl LookupError {
    /// Returns `true` when the store confirmed the object cannot be read,
    /// either because it does not exist or because access was denied.
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            LookupError::NotFound { .. } | LookupError::Unauthorized { .. }
        )
    }

    /// The path the failed lookup was issued for.
    pub fn path(&self) -> &str {
        match self {
            LookupError::NotFound { path }
            | LookupError::Unauthorized { path }
            | LookupError::Other { path, .. } => path,
        }
    }
}
