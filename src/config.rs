//! Server configuration from command-line flags and environment variables.
//!
//! Every flag falls back to an environment variable:
//!
//! ```bash
//! CLASSCOLLAB_BIND_ADDR=127.0.0.1:8000      # listen address
//! DATABASE_URL=postgres://localhost/classcollab  # unset: in-memory store
//! CLASSCOLLAB_DB_POOL_SIZE=10
//! CLASSCOLLAB_JWT_SECRET=change-me          # required
//! CLASSCOLLAB_ACCESS_TOKEN_MINUTES=5
//! CLASSCOLLAB_REFRESH_TOKEN_HOURS=24
//! ```

use chrono::Duration;
use clap::Parser;
use std::fmt;
use std::net::SocketAddr;

/// Listen address variable.
pub const BIND_ADDR_VAR: &str = "CLASSCOLLAB_BIND_ADDR";
/// Database URL variable.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Connection pool size variable.
pub const POOL_SIZE_VAR: &str = "CLASSCOLLAB_DB_POOL_SIZE";
/// Token signing secret variable.
pub const JWT_SECRET_VAR: &str = "CLASSCOLLAB_JWT_SECRET";
/// Access token lifetime variable, in minutes.
pub const ACCESS_MINUTES_VAR: &str = "CLASSCOLLAB_ACCESS_TOKEN_MINUTES";
/// Refresh token lifetime variable, in hours.
pub const REFRESH_HOURS_VAR: &str = "CLASSCOLLAB_REFRESH_TOKEN_HOURS";

/// Command-line interface of the server binary.
#[derive(Clone, PartialEq, Eq, Parser)]
#[command(name = "classcollab_server")]
#[command(about = "Study group collaboration API server")]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = BIND_ADDR_VAR, default_value = "127.0.0.1:8000")]
    pub bind_addr: SocketAddr,

    /// `PostgreSQL` URL; data is kept in memory when unset
    #[arg(long, env = DATABASE_URL_VAR, hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(
        long,
        env = POOL_SIZE_VAR,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub db_pool_size: u32,

    /// HMAC secret for signing tokens
    #[arg(long, env = JWT_SECRET_VAR, hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token lifetime in minutes
    #[arg(
        long,
        env = ACCESS_MINUTES_VAR,
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub access_token_minutes: u32,

    /// Refresh token lifetime in hours
    #[arg(
        long,
        env = REFRESH_HOURS_VAR,
        default_value_t = 24,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub refresh_token_hours: u32,
}

/// Where the server keeps its data.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Process-local tables; data is lost on exit.
    InMemory,
    /// `PostgreSQL` database.
    Postgres {
        /// Connection URL.
        url: String,
        /// Maximum pooled connections.
        pool_size: u32,
    },
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InMemory => f.write_str("InMemory"),
            Self::Postgres { pool_size, .. } => f
                .debug_struct("Postgres")
                .field("pool_size", pool_size)
                .finish_non_exhaustive(),
        }
    }
}

/// Complete server configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listen address.
    pub bind_addr: SocketAddr,
    /// Storage backend.
    pub storage: StorageConfig,
    /// HMAC secret for signing tokens.
    pub jwt_secret: String,
    /// Access token lifetime.
    pub access_token_ttl: Duration,
    /// Refresh token lifetime.
    pub refresh_token_ttl: Duration,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("storage", &self.storage)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Parses `args` (program name first), filling gaps from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`clap::Error`] when a required value is missing or a value
    /// does not parse.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        ServerArgs::try_parse_from(args).map(Self::from)
    }
}

impl From<ServerArgs> for AppConfig {
    fn from(args: ServerArgs) -> Self {
        let storage = args
            .database_url
            .filter(|url| !url.trim().is_empty())
            .map_or(StorageConfig::InMemory, |url| StorageConfig::Postgres {
                url,
                pool_size: args.db_pool_size,
            });
        Self {
            bind_addr: args.bind_addr,
            storage,
            jwt_secret: args.jwt_secret,
            access_token_ttl: Duration::minutes(i64::from(args.access_token_minutes)),
            refresh_token_ttl: Duration::hours(i64::from(args.refresh_token_hours)),
        }
    }
}
