//! `PostgreSQL` adapters for accounts and revoked tokens.

mod models;
mod repository;

pub use repository::{PostgresTokenRevocations, PostgresUserRepository};
