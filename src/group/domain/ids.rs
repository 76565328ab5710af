//! Identifier and invite code types for the group domain.

use super::GroupDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of characters in an invite code.
pub const INVITE_CODE_LENGTH: usize = 8;

/// Characters invite codes are drawn from.
pub const INVITE_CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Unique identifier for a study group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(Uuid);

impl GroupId {
    /// Creates a new random group identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a group identifier from an existing UUID.
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

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Eight-character code that lets a user join a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteCode(String);

impl InviteCode {
    /// Creates a validated invite code.
    ///
    /// Surrounding whitespace is trimmed and letters are uppercased before
    /// validation, so codes typed in lowercase still match.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::EmptyField`] for a blank value and
    /// [`GroupDomainError::InvalidInviteCode`] when the value is not exactly
    /// eight characters from `A-Z0-9`.
    pub fn new(value: impl Into<String>) -> Result<Self, GroupDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_uppercase();

        if normalized.is_empty() {
            return Err(GroupDomainError::EmptyField("invite code"));
        }

        let is_valid = normalized.len() == INVITE_CODE_LENGTH
            && normalized.bytes().all(|b| INVITE_CODE_ALPHABET.contains(&b));
        if !is_valid {
            return Err(GroupDomainError::InvalidInviteCode(raw));
        }

        Ok(Self(normalized))
    }

    /// Wraps a code drawn from [`INVITE_CODE_ALPHABET`] by a generator.
    pub(crate) const fn from_generated(code: String) -> Self {
        Self(code)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InviteCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
