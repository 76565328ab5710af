//! Error types for identity domain validation.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The username contains characters outside `[A-Za-z0-9@.+_-]`.
    #[error("username '{0}' may only contain letters, digits and @/./+/-/_")]
    InvalidUsername(String),

    /// The username exceeds the 150-character storage limit.
    #[error("username exceeds 150 character limit: {0}")]
    UsernameTooLong(String),

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,
}
