//! Bearer token value types.

use super::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Purpose of a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token presented on every authenticated request.
    Access,
    /// Longer-lived token exchanged for new access tokens.
    Refresh,
}

impl TokenKind {
    /// Returns the canonical claim representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl TryFrom<&str> for TokenKind {
    type Error = ParseTokenKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "access" => Ok(Self::Access),
            "refresh" => Ok(Self::Refresh),
            _ => Err(ParseTokenKindError(value.to_owned())),
        }
    }
}

/// Error returned while parsing a token kind claim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown token kind: {0}")]
pub struct ParseTokenKindError(pub String);

/// Verified contents of a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// User the token was issued to.
    pub subject: UserId,
    /// Purpose of the token.
    pub kind: TokenKind,
    /// Unique token identifier.
    pub token_id: Uuid,
    /// Issue timestamp.
    pub issued_at: DateTime<Utc>,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

/// An encoded token and the moment it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded token string.
    pub token: String,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Access and refresh tokens issued together at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Access token.
    pub access: IssuedToken,
    /// Refresh token.
    pub refresh: IssuedToken,
}

/// SHA-256 digest of an encoded token, used to record revocations without
/// storing the token itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Computes the digest of an encoded token.
    #[must_use]
    pub fn of(token: &str) -> Self {
        Self(format!("{:x}", Sha256::digest(token.as_bytes())))
    }

    /// Returns the lowercase hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
