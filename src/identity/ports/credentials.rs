//! Credential hashing and token issuance ports.
//!
//! Both are synchronous: hashing and signing are CPU-bound and carry no
//! I/O.

use crate::identity::domain::{IssuedToken, PasswordHash, TokenClaims, TokenKind, User};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by credential adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// Hashing or hash parsing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// The token could not be encoded.
    #[error("token encoding failed: {0}")]
    Encoding(String),

    /// The token is malformed or its signature does not verify.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The token verified but was issued for another purpose.
    #[error("expected a {expected} token")]
    WrongKind {
        /// Kind the caller required.
        expected: &'static str,
    },

    /// The token verified but has expired.
    #[error("token has expired")]
    Expired,
}

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hashing`] when the hasher fails.
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError>;

    /// Verifies a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hashing`] when the stored hash cannot be
    /// parsed.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, CredentialError>;
}

/// Signs and verifies bearer tokens.
pub trait TokenIssuer: Send + Sync {
    /// Issues a token of the given kind for the user.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Encoding`] when signing fails.
    fn issue(
        &self,
        user: &User,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, CredentialError>;

    /// Verifies a token's signature, kind, and expiry at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::InvalidToken`],
    /// [`CredentialError::WrongKind`], or [`CredentialError::Expired`].
    fn verify(
        &self,
        token: &str,
        expected: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, CredentialError>;
}
