//! In-memory user repository backed by the shared store.

use async_trait::async_trait;

use crate::identity::{
    domain::{EmailAddress, UserAccount, UserId, Username},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::store::memory::InMemoryStore;

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

impl InMemoryUserRepository {
    /// Creates a repository over the given store.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, account: &UserAccount) -> UserRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(UserRepositoryError::persistence)?;
        let user = account.user();
        for existing in tables.users.values() {
            if existing.user().username() == user.username() {
                return Err(UserRepositoryError::DuplicateUsername(
                    user.username().clone(),
                ));
            }
            if existing.user().email() == user.email() {
                return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
            }
        }
        tables.users.insert(user.id(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<UserAccount>> {
        let tables = self
            .store
            .read()
            .map_err(UserRepositoryError::persistence)?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> UserRepositoryResult<Option<UserAccount>> {
        let tables = self
            .store
            .read()
            .map_err(UserRepositoryError::persistence)?;
        Ok(tables
            .users
            .values()
            .find(|account| account.user().email() == email)
            .cloned())
    }

    async fn username_exists(&self, username: &Username) -> UserRepositoryResult<bool> {
        let tables = self
            .store
            .read()
            .map_err(UserRepositoryError::persistence)?;
        Ok(tables
            .users
            .values()
            .any(|account| account.user().username() == username))
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(UserRepositoryError::persistence)?;
        tables
            .remove_user(id)
            .map(|_| ())
            .ok_or(UserRepositoryError::NotFound(id))
    }
}
