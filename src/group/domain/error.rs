//! Error types for group domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing group domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GroupDomainError {
    /// A required text field is empty after trimming.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// A text field exceeds its storage limit.
    #[error("{field} exceeds {max} character limit")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Maximum permitted characters.
        max: usize,
    },

    /// The invite code is not eight characters from `A-Z0-9`.
    #[error("invalid invite code '{0}'")]
    InvalidInviteCode(String),
}

/// Error returned while parsing membership roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown membership role: {0}")]
pub struct ParseMembershipRoleError(pub String);
