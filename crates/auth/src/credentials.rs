//! Credential store: bearer token → access level.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;

use crate::{AccessLevel, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The backing store failed (connection, query, ...).
    #[error("credential store unavailable: {0}")]
    Backend(String),

    /// A stored record carries an access level outside `read`/`write`.
    #[error("credential record has invalid access level '{0}'")]
    InvalidAccessLevel(String),
}

/// Resolves static bearer tokens to principals.
///
/// Tokens have indefinite validity; revocation happens out-of-band by
/// removing the record. Implementations perform exactly one lookup per call
/// and never cache.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` when the token is unknown.
    async fn resolve(&self, token: &str) -> Result<Option<Principal>, CredentialError>;
}

#[async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn resolve(&self, token: &str) -> Result<Option<Principal>, CredentialError> {
        (**self).resolve(token).await
    }
}

/// In-memory credential store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<HashMap<String, AccessLevel>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(self, token: impl Into<String>, level: AccessLevel) -> Self {
        self.insert(token, level);
        self
    }

    pub fn insert(&self, token: impl Into<String>, level: AccessLevel) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(token.into(), level);
        }
    }

    /// Revoke a token; returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.inner
            .write()
            .map(|mut map| map.remove(token).is_some())
            .unwrap_or(false)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn resolve(&self, token: &str) -> Result<Option<Principal>, CredentialError> {
        let map = self
            .inner
            .read()
            .map_err(|_| CredentialError::Backend("credential map poisoned".to_string()))?;
        Ok(map.get(token).map(|level| Principal::new(token, *level)))
    }
}
