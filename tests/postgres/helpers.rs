//! Shared helpers for `PostgreSQL` integration tests.

pub use crate::test_helpers::BoxError;
use crate::test_helpers::credentials;
use classcollab::app::{PostgresBackend, ServiceRegistry};
use classcollab::store::postgres::{apply_schema, build_pool};
use mockable::DefaultClock;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Variable naming the database the tests may use.
pub const TEST_DATABASE_URL_VAR: &str = "CLASSCOLLAB_TEST_DATABASE_URL";

/// Services over `PostgreSQL` and the system clock.
pub type PgServices = ServiceRegistry<PostgresBackend, DefaultClock>;

/// Connects to the test database and applies the schema.
///
/// Returns `Ok(None)` when [`TEST_DATABASE_URL_VAR`] is unset.
///
/// # Errors
///
/// Returns an error when the pool cannot be built or the schema fails.
pub async fn postgres_services() -> Result<Option<PgServices>, BoxError> {
    let Some(url) = std::env::var(TEST_DATABASE_URL_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
    else {
        warn!("{TEST_DATABASE_URL_VAR} is not set; skipping PostgreSQL test");
        return Ok(None);
    };

    let pool = tokio::task::spawn_blocking(move || {
        let connections = build_pool(&url, 4)?;
        apply_schema(&connections)?;
        Ok::<_, BoxError>(connections)
    })
    .await??;

    Ok(Some(ServiceRegistry::new(
        &PostgresBackend::new(&pool),
        credentials(),
        Arc::new(DefaultClock),
    )))
}

/// Returns `prefix` with a random suffix, valid as a username.
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}
