//! `PostgreSQL` adapter for the message log.

mod models;
mod repository;

pub use repository::PostgresMessageRepository;
