//! In-memory revocation list backed by the shared store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::identity::{
    domain::TokenDigest,
    ports::{TokenRevocationRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::store::memory::InMemoryStore;

/// Thread-safe in-memory token revocation list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenRevocations {
    store: InMemoryStore,
}

impl InMemoryTokenRevocations {
    /// Creates a revocation list over the given store.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TokenRevocationRepository for InMemoryTokenRevocations {
    async fn revoke(
        &self,
        digest: &TokenDigest,
        expires_at: DateTime<Utc>,
    ) -> UserRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(UserRepositoryError::persistence)?;
        tables.revoked_tokens.insert(digest.clone(), expires_at);
        Ok(())
    }

    async fn is_revoked(&self, digest: &TokenDigest) -> UserRepositoryResult<bool> {
        let tables = self
            .store
            .read()
            .map_err(UserRepositoryError::persistence)?;
        Ok(tables.revoked_tokens.contains_key(digest))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> UserRepositoryResult<u64> {
        let mut tables = self
            .store
            .write()
            .map_err(UserRepositoryError::persistence)?;
        let before = tables.revoked_tokens.len();
        tables
            .revoked_tokens
            .retain(|_, expires_at| *expires_at > now);
        let purged = before.saturating_sub(tables.revoked_tokens.len());
        u64::try_from(purged).map_err(UserRepositoryError::persistence)
    }
}
