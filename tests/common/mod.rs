#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use docref::errors::LookupError;
use docref::resolution::PathResolver;

/// Scripted object store: paths without a scripted answer report `NotFound`.
/// Every lookup is recorded in call order.
#[derive(Default)]
pub struct FakeStore {
    answers: HashMap<String, Result<String, LookupError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, path: &str, url: &str) -> Self {
        self.answers.insert(path.to_string(), Ok(url.to_string()));
        self
    }

    pub fn with_unauthorized(mut self, path: &str) -> Self {
        self.answers.insert(
            path.to_string(),
            Err(LookupError::Unauthorized {
                path: path.to_string(),
            }),
        );
        self
    }

    pub fn with_failure(mut self, path: &str, message: &str) -> Self {
        self.answers.insert(
            path.to_string(),
            Err(LookupError::Other {
                path: path.to_string(),
                message: message.to_string(),
            }),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PathResolver for FakeStore {
    async fn resolve_path(&self, path: &str) -> Result<String, LookupError> {
        self.calls.lock().unwrap().push(path.to_string());
        self.answers
            .get(path)
            .cloned()
            .unwrap_or_else(|| {
                Err(LookupError::NotFound {
                    path: path.to_string(),
                })
            })
    }
}
