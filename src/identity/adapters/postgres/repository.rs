//! `PostgreSQL` repositories for accounts and the revocation list.

use super::models::{RevokedTokenRow, UserRow};
use crate::identity::{
    domain::{
        EmailAddress, PasswordHash, PersistedUserData, TokenDigest, User, UserAccount, UserId,
        Username,
    },
    ports::{TokenRevocationRepository, UserRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::store::postgres::{
    PersistenceFailure, PgPool, run_blocking,
    schema::{revoked_tokens, users},
    unique_violation,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{count_star, exists, select};
use diesel::prelude::*;

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

impl PersistenceFailure for UserRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, account: &UserAccount) -> UserRepositoryResult<()> {
        let row = to_row(account);
        let username = account.user().username().clone();
        let email = account.user().email().clone();
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(users::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match unique_violation(&err) {
                    Some(USERNAME_CONSTRAINT) => {
                        UserRepositoryError::DuplicateUsername(username.clone())
                    }
                    Some(EMAIL_CONSTRAINT) => UserRepositoryError::DuplicateEmail(email.clone()),
                    _ => UserRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<UserAccount>> {
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .find(id.into_inner())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> UserRepositoryResult<Option<UserAccount>> {
        let lookup = email.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_account).transpose()
        })
        .await
    }

    async fn username_exists(&self, username: &Username) -> UserRepositoryResult<bool> {
        let lookup = username.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            select(exists(users::table.filter(users::username.eq(lookup))))
                .get_result::<bool>(connection)
                .map_err(UserRepositoryError::persistence)
        })
        .await
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted = diesel::delete(users::table.find(id.into_inner()))
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(UserRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

/// `PostgreSQL`-backed token revocation list.
#[derive(Debug, Clone)]
pub struct PostgresTokenRevocations {
    pool: PgPool,
}

impl PostgresTokenRevocations {
    /// Creates a new revocation list from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRevocationRepository for PostgresTokenRevocations {
    async fn revoke(
        &self,
        digest: &TokenDigest,
        expires_at: DateTime<Utc>,
    ) -> UserRepositoryResult<()> {
        let row = RevokedTokenRow {
            token_digest: digest.as_str().to_owned(),
            expires_at,
        };
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(revoked_tokens::table)
                .values(&row)
                .on_conflict(revoked_tokens::token_digest)
                .do_nothing()
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn is_revoked(&self, digest: &TokenDigest) -> UserRepositoryResult<bool> {
        let lookup = digest.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let count = revoked_tokens::table
                .filter(revoked_tokens::token_digest.eq(lookup))
                .select(count_star())
                .first::<i64>(connection)
                .map_err(UserRepositoryError::persistence)?;
            Ok(count > 0)
        })
        .await
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> UserRepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            let purged = diesel::delete(
                revoked_tokens::table.filter(revoked_tokens::expires_at.le(now)),
            )
            .execute(connection)
            .map_err(UserRepositoryError::persistence)?;
            u64::try_from(purged).map_err(UserRepositoryError::persistence)
        })
        .await
    }
}

fn to_row(account: &UserAccount) -> UserRow {
    let user = account.user();
    UserRow {
        id: user.id().into_inner(),
        username: user.username().as_str().to_owned(),
        email: user.email().as_str().to_owned(),
        password_hash: account.password_hash().as_str().to_owned(),
        first_name: user.first_name().to_owned(),
        last_name: user.last_name().to_owned(),
        date_joined: user.date_joined(),
    }
}

fn row_to_account(row: UserRow) -> UserRepositoryResult<UserAccount> {
    let username = Username::new(row.username).map_err(UserRepositoryError::persistence)?;
    let email = EmailAddress::new(row.email).map_err(UserRepositoryError::persistence)?;
    let user = User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(row.id),
        username,
        email,
        first_name: row.first_name,
        last_name: row.last_name,
        date_joined: row.date_joined,
    });
    Ok(UserAccount::new(user, PasswordHash::new(row.password_hash)))
}
