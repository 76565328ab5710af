//! Runs the ClassCollab HTTP API.
//!
//! Usage:
//!
//! ```text
//! CLASSCOLLAB_JWT_SECRET=change-me classcollab_server --bind-addr 0.0.0.0:8000
//! ```
//!
//! Configuration comes from flags, each backed by an environment variable
//! (see [`classcollab::config`]; `--help` lists them). Without
//! `DATABASE_URL` the server keeps its data in memory; with it the schema is
//! applied at startup and data lives in `PostgreSQL`. Log verbosity follows `RUST_LOG`, defaulting to `info`.

use clap::Parser;
use classcollab::app::{Backend, Credentials, InMemoryBackend, PostgresBackend, ServiceRegistry};
use classcollab::config::{AppConfig, ServerArgs, StorageConfig};
use classcollab::http::router;
use classcollab::identity::adapters::{argon2::Argon2PasswordHasher, jwt::JwtTokenIssuer};
use classcollab::store::postgres::{apply_schema, build_pool};
use mockable::DefaultClock;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::from(ServerArgs::parse());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(?config, "configuration loaded");

    let credentials = Credentials {
        hasher: Arc::new(Argon2PasswordHasher::default()),
        issuer: Arc::new(JwtTokenIssuer::new(
            config.jwt_secret.as_bytes(),
            config.access_token_ttl,
            config.refresh_token_ttl,
        )),
    };

    match config.storage.clone() {
        StorageConfig::InMemory => {
            warn!("DATABASE_URL is not set; data will be lost on exit");
            serve(&config, &InMemoryBackend::default(), credentials).await
        }
        StorageConfig::Postgres { url, pool_size } => {
            let pool = tokio::task::spawn_blocking(move || {
                let connections = build_pool(&url, pool_size)?;
                apply_schema(&connections)?;
                Ok::<_, BoxError>(connections)
            })
            .await??;
            info!(pool_size, "database schema applied");
            serve(&config, &PostgresBackend::new(&pool), credentials).await
        }
    }
}

async fn serve<B: Backend>(
    config: &AppConfig,
    backend: &B,
    credentials: Credentials,
) -> Result<(), BoxError> {
    let services = Arc::new(ServiceRegistry::new(
        backend,
        credentials,
        Arc::new(DefaultClock),
    ));
    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(services))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
