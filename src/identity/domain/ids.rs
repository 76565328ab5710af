//! Identifier and validated scalar types for the identity domain.

use super::IdentityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum username length, matching the `VARCHAR(150)` column.
const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum email length, matching the `VARCHAR(254)` column.
const MAX_EMAIL_LENGTH: usize = 254;

/// Unique identifier for a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated login name.
///
/// Usernames are case-sensitive and may contain letters, digits and the
/// characters `@`, `.`, `+`, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyUsername`] when the value is empty
    /// after trimming, [`IdentityDomainError::UsernameTooLong`] when it
    /// exceeds 150 characters, or [`IdentityDomainError::InvalidUsername`]
    /// when it contains other characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(IdentityDomainError::EmptyUsername);
        }

        if normalized.chars().count() > MAX_USERNAME_LENGTH {
            return Err(IdentityDomainError::UsernameTooLong(raw));
        }

        let is_valid = normalized
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
        if !is_valid {
            return Err(IdentityDomainError::InvalidUsername(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated email address used as the login identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Only the shape `local@domain` is checked; the domain part is
    /// lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::InvalidEmail`] when the value is not of
    /// the form `local@domain`, contains whitespace, or exceeds 254
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(IdentityDomainError::InvalidEmail(raw));
        };
        let is_valid = !local.is_empty()
            && !domain.is_empty()
            && !domain.contains('@')
            && !normalized.chars().any(char::is_whitespace)
            && normalized.chars().count() <= MAX_EMAIL_LENGTH;
        if !is_valid {
            return Err(IdentityDomainError::InvalidEmail(raw));
        }

        Ok(Self(format!("{local}@{}", domain.to_ascii_lowercase())))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
