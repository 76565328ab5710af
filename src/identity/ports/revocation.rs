//! Port for recording revoked bearer tokens.

use super::UserRepositoryResult;
use crate::identity::domain::TokenDigest;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Revocation list consulted on every authenticated request.
#[async_trait]
pub trait TokenRevocationRepository: Send + Sync {
    /// Records a token as revoked until it would have expired anyway.
    ///
    /// Revoking an already revoked token is not an error.
    async fn revoke(&self, digest: &TokenDigest, expires_at: DateTime<Utc>)
    -> UserRepositoryResult<()>;

    /// Returns `true` when the token has been revoked.
    async fn is_revoked(&self, digest: &TokenDigest) -> UserRepositoryResult<bool>;

    /// Removes entries whose tokens have expired, returning how many were
    /// removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> UserRepositoryResult<u64>;
}
