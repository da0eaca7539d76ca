//! Object-store lookup backed by the Firebase Storage REST API.
//!
//! `GET {endpoint}/v0/b/{bucket}/o/{path}` returns the object's metadata,
//! whose `downloadTokens` field is turned into a tokenized media URL.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use tracing::debug;

use crate::config::DocRefConfig;
use crate::errors::{LookupError, Result};
use crate::resolution::PathResolver;

/// Characters left unescaped in a single URL path component.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Subset of the object metadata returned by the storage API.
#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    #[serde(rename = "downloadTokens", default)]
    download_tokens: Option<String>,
}

/// A bucket on a storage endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    endpoint: String,
    bucket: String,
}

impl StorageLocation {
    pub fn new(endpoint: &str, bucket: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        }
    }

    /// URL of the metadata resource for `path`.
    pub fn object_url(&self, path: &str) -> String {
        format!(
            "{}/v0/b/{}/o/{}",
            self.endpoint,
            encode_component(&self.bucket),
            encode_component(path)
        )
    }

    /// Public media URL for `path` carrying a download token.
    pub fn download_url(&self, path: &str, token: &str) -> String {
        format!(
            "{}?alt=media&token={}",
            self.object_url(path),
            encode_component(token)
        )
    }
}

/// [`PathResolver`] talking to Firebase Storage.
///
/// Each lookup runs the blocking HTTP call on tokio's blocking pool.
pub struct FirebaseStorageResolver {
    agent: ureq::Agent,
    location: StorageLocation,
    auth_token: Option<String>,
}

impl FirebaseStorageResolver {
    /// Builds a resolver from a validated configuration, reading the auth
    /// token from the configured environment variable.
    pub fn from_config(config: &DocRefConfig) -> Result<Self> {
        config.validate()?;
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.request_timeout()))
            .build()
            .into();
        Ok(Self {
            agent,
            location: StorageLocation::new(&config.storage_endpoint, &config.storage_bucket),
            auth_token: config.auth_token(),
        })
    }
}

#[async_trait]
impl PathResolver for FirebaseStorageResolver {
    async fn resolve_path(&self, path: &str) -> std::result::Result<String, LookupError> {
        let agent = self.agent.clone();
        let location = self.location.clone();
        let auth_token = self.auth_token.clone();
        let owned_path = path.to_string();

        tokio::task::spawn_blocking(move || {
            fetch_download_url(&agent, &location, auth_token.as_deref(), &owned_path)
        })
        .await
        .map_err(|e| LookupError::Other {
            path: path.to_string(),
            message: format!("lookup task failed: {e}"),
        })?
    }
}

fn fetch_download_url(
    agent: &ureq::Agent,
    location: &StorageLocation,
    auth_token: Option<&str>,
    path: &str,
) -> std::result::Result<String, LookupError> {
    let url = location.object_url(path);
    debug!(url = %url, "fetching object metadata");

    let mut request = agent.get(&url);
    if let Some(token) = auth_token {
        request = request.header("Authorization", &format!("Firebase {token}"));
    }

    let mut response = request.call().map_err(|e| map_http_error(path, e))?;
    let metadata: ObjectMetadata = response
        .body_mut()
        .read_json()
        .map_err(|e| map_http_error(path, e))?;

    let token = metadata
        .download_tokens
        .as_deref()
        .and_then(first_token)
        .ok_or_else(|| LookupError::Other {
            path: path.to_string(),
            message: "object has no download token".to_string(),
        })?;

    Ok(location.download_url(path, token))
}

/// Maps an HTTP failure onto the lookup taxonomy.
pub fn map_http_error(path: &str, err: ureq::Error) -> LookupError {
    match err {
        ureq::Error::StatusCode(404) => LookupError::NotFound {
            path: path.to_string(),
        },
        ureq::Error::StatusCode(401 | 403) => LookupError::Unauthorized {
            path: path.to_string(),
        },
        other => LookupError::Other {
            path: path.to_string(),
            message: other.to_string(),
        },
    }
}

fn first_token(tokens: &str) -> Option<&str> {
    tokens
        .split(',')
        .map(str::trim)
        .find(|token| !token.is_empty())
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
