//! `PostgreSQL` adapter for the task board.

mod models;
mod repository;

pub use repository::PostgresTaskRepository;
