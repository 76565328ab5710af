//! Shared fixtures and environment guards for integration tests.

use classcollab::app::{Backend, Credentials, InMemoryBackend, ServiceRegistry};
use classcollab::group::services::GroupFields;
use classcollab::identity::adapters::{argon2::Argon2PasswordHasher, jwt::JwtTokenIssuer};
use classcollab::identity::services::{LoginRequest, RegisterRequest, Session};
use chrono::Duration;
use eyre::WrapErr;
use mockable::DefaultClock;
use std::env;
use std::ffi::OsString;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Boxed error used by fallible test helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Services over the in-memory backend and the system clock.
pub type MemoryServices = ServiceRegistry<InMemoryBackend, DefaultClock>;

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Guard that applies a scoped environment variable update.
pub struct EnvVarGuard {
    previous: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Sets or clears each variable for the guard lifetime.
    pub fn set_many(changes: &[(&str, Option<&str>)]) -> Self {
        let lock = env_lock();
        let mut previous = Vec::with_capacity(changes.len());

        for (key, value) in changes {
            previous.push((OsString::from(key), env::var_os(key)));
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(new_value) => env::set_var(key, new_value),
                    None => env::remove_var(key),
                }
            }
        }

        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(previous) => env::set_var(&key, &previous),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Cheap argon2 parameters and a fixed signing secret.
pub fn credentials() -> Credentials {
    Credentials {
        hasher: Arc::new(Argon2PasswordHasher::with_params(8, 1, 1).expect("valid argon2 params")),
        issuer: Arc::new(JwtTokenIssuer::new(
            b"integration-secret",
            Duration::minutes(5),
            Duration::hours(24),
        )),
    }
}

/// Every service over a fresh in-memory store.
pub fn in_memory_services() -> MemoryServices {
    ServiceRegistry::new(
        &InMemoryBackend::default(),
        credentials(),
        Arc::new(DefaultClock),
    )
}

/// Registers `username` at `<username>@uni.edu` with password `pw` and logs
/// in.
///
/// # Errors
///
/// Returns an error when registration or login fails.
pub async fn sign_up<B: Backend>(
    services: &ServiceRegistry<B, DefaultClock>,
    username: &str,
) -> eyre::Result<Session> {
    let email = format!("{username}@uni.edu");
    services
        .accounts
        .register(RegisterRequest::new(username, email.as_str(), "pw", "pw"))
        .await
        .wrap_err_with(|| format!("register {username}"))?;
    services
        .accounts
        .login(LoginRequest::new(email, "pw"))
        .await
        .wrap_err_with(|| format!("log in {username}"))
}

/// Valid group fields named `name`.
pub fn study_group(name: &str) -> GroupFields {
    GroupFields {
        name: name.to_owned(),
        description: "Weekly problem sets".to_owned(),
        subject: "Algorithms".to_owned(),
        semester: "Spring 2026".to_owned(),
    }
}
