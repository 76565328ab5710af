//! Repository port for user account persistence.

use crate::identity::domain::{EmailAddress, UserAccount, UserId, Username};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User account persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new account.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateUsername`] or
    /// [`UserRepositoryError::DuplicateEmail`] when either unique field is
    /// already taken.
    async fn store(&self, account: &UserAccount) -> UserRepositoryResult<()>;

    /// Finds an account by identifier.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<UserAccount>>;

    /// Finds an account by email address.
    async fn find_by_email(&self, email: &EmailAddress)
    -> UserRepositoryResult<Option<UserAccount>>;

    /// Returns `true` when the username is already registered.
    async fn username_exists(&self, username: &Username) -> UserRepositoryResult<bool>;

    /// Deletes an account.
    ///
    /// Memberships and sent messages are removed with the user; tasks
    /// assigned to the user become unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not
    /// exist.
    async fn delete(&self, id: UserId) -> UserRepositoryResult<()>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// The username is already registered.
    #[error("duplicate username: {0}")]
    DuplicateUsername(Username),

    /// The email address is already registered.
    #[error("duplicate email: {0}")]
    DuplicateEmail(EmailAddress),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
