use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{DocRefError, Result};

/// Name of the configuration file stored inside the `.docref` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory used to store docref settings.
pub const DOCREF_DIR: &str = ".docref";

/// Default object-store endpoint.
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://firebasestorage.googleapis.com";

/// Default name of the environment variable holding the storage auth token.
pub const DEFAULT_TOKEN_ENV: &str = "DOCREF_STORAGE_TOKEN";

/// Configuration for resolving document references against an object store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocRefConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Storage bucket that document paths are relative to.
    pub storage_bucket: String,
    /// Base URL of the storage REST API.
    pub storage_endpoint: String,
    /// Per-lookup timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Environment variable to read the auth token from. The token itself
    /// never lives in the config file.
    pub auth_token_env: String,
}

impl Default for DocRefConfig {
    fn default() -> Self {
        Self {
            version: 1,
            storage_bucket: String::new(),
            storage_endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
            request_timeout_ms: 10_000,
            auth_token_env: DEFAULT_TOKEN_ENV.to_string(),
        }
    }
}

impl DocRefConfig {
    /// Checks that the configuration can be used for remote lookups.
    pub fn validate(&self) -> Result<()> {
        if self.storage_bucket.trim().is_empty() {
            return Err(DocRefError::Config {
                message: "storage_bucket must be set".to_string(),
            });
        }
        if self.storage_endpoint.trim().is_empty() {
            return Err(DocRefError::Config {
                message: "storage_endpoint must be set".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(DocRefError::Config {
                message: "request_timeout_ms must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Reads the auth token from the configured environment variable, if set
    /// and non-empty.
    pub fn auth_token(&self) -> Option<String> {
        std::env::var(&self.auth_token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

/// Returns the path to the `.docref` directory within the given project root.
pub fn get_docref_dir(project_root: &Path) -> PathBuf {
    project_root.join(DOCREF_DIR)
}

/// Returns the path to the configuration file within the `.docref` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_docref_dir(project_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default
/// configuration. Fields missing from the file take their default values.
pub fn load_config(project_root: &Path) -> Result<DocRefConfig> {
    let config_path = get_config_path(project_root);
    if !config_path.exists() {
        return Ok(DocRefConfig::default());
    }

    let contents = fs::read_to_string(&config_path)
        .map_err(|e| config_error("read", &config_path, e))?;
    serde_json::from_str(&contents).map_err(|e| config_error("parse", &config_path, e))
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes `config.tmp` first and renames it into place, so a reader never
/// sees a partially written file.
pub fn save_config(project_root: &Path, config: &DocRefConfig) -> Result<()> {
    let docref_dir = get_docref_dir(project_root);
    fs::create_dir_all(&docref_dir).map_err(|e| config_error("create", &docref_dir, e))?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");
    let json = serde_json::to_string_pretty(config)?;

    fs::write(&tmp_path, json).map_err(|e| config_error("write", &tmp_path, e))?;
    fs::rename(&tmp_path, &config_path).map_err(|e| config_error("replace", &config_path, e))
}

fn config_error(action: &str, path: &Path, err: impl std::fmt::Display) -> DocRefError {
    DocRefError::Config {
        message: format!("failed to {} '{}': {}", action, path.display(), err),
    }
}
