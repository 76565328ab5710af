//! Diesel row models for identity persistence.

use crate::store::postgres::schema::{revoked_tokens, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result and insert row for user accounts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// PHC-encoded password hash.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Registration timestamp.
    pub date_joined: DateTime<Utc>,
}

/// Insert row for revoked tokens.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = revoked_tokens)]
pub struct RevokedTokenRow {
    /// Lowercase hex digest.
    pub token_digest: String,
    /// Expiry of the revoked token.
    pub expires_at: DateTime<Utc>,
}
