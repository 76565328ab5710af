//! `PostgreSQL` connection pool, schema bootstrap, and blocking helpers.
//!
//! Diesel is synchronous, so every repository call is offloaded to
//! [`tokio::task::spawn_blocking`] through [`run_blocking`].

pub(crate) mod schema;

use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// SQL creating every table, index, and constraint. Idempotent.
pub const SCHEMA_SQL: &str =
    include_str!("../../../migrations/2026-10-01-000000_create_study_tables/up.sql");

/// Errors raised while preparing the database.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No connection could be obtained.
    #[error("failed to obtain connection: {0}")]
    Pool(#[from] PoolError),
    /// The schema script failed.
    #[error("failed to apply schema: {0}")]
    Query(#[from] DieselError),
}

/// Builds a connection pool for the given database URL.
///
/// # Errors
///
/// Returns [`PoolError`] when the pool cannot establish its initial
/// connections.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}

/// Applies [`SCHEMA_SQL`] using a pooled connection.
///
/// # Errors
///
/// Returns [`SchemaError`] when no connection is available or the script
/// fails.
pub fn apply_schema(pool: &PgPool) -> Result<(), SchemaError> {
    let mut connection = pool.get()?;
    connection.batch_execute(SCHEMA_SQL)?;
    Ok(())
}

/// Repository error types that can wrap infrastructure failures.
pub(crate) trait PersistenceFailure: Sized {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

/// Runs a Diesel closure on the blocking thread pool with a pooled
/// connection.
pub(crate) async fn run_blocking<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: PersistenceFailure + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(E::from_failure)?;
        f(&mut connection)
    })
    .await
    .map_err(E::from_failure)?
}

/// Returns the violated constraint name for unique violations.
pub(crate) fn unique_violation(err: &DieselError) -> Option<&str> {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            info.constraint_name()
        }
        _ => None,
    }
}

/// Returns `true` for foreign key violations.
pub(crate) const fn is_foreign_key_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}

/// Converts a row count returned by `COUNT(*)` into `u64`.
pub(crate) fn count_to_u64<E: PersistenceFailure>(count: i64) -> Result<u64, E> {
    u64::try_from(count).map_err(E::from_failure)
}
