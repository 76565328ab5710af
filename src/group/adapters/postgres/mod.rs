//! `PostgreSQL` adapter for the group registry.

mod models;
mod repository;

pub use repository::PostgresGroupRepository;
