//! ClassCollab: study group collaboration backend.
//!
//! Students register, create or join study groups with invite codes, and
//! share a task board and a message log inside each group. Membership and
//! role checks decide who may see or change what.
//!
//! # Architecture
//!
//! ClassCollab follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory and
//!   `PostgreSQL` repositories, argon2 hashing, JWT tokens)
//!
//! # Modules
//!
//! - [`identity`]: Accounts, credentials, and bearer tokens
//! - [`group`]: Study groups, memberships, invite codes, and access control
//! - [`task`]: Group task board
//! - [`message`]: Group message log
//! - [`dashboard`]: Per-user summary counters
//! - [`store`]: Shared in-memory and `PostgreSQL` storage
//! - [`app`]: Service wiring over a chosen storage backend
//! - [`http`]: JSON HTTP API
//! - [`config`]: Environment configuration

pub mod app;
pub mod config;
pub mod dashboard;
pub mod group;
pub mod http;
pub mod identity;
pub mod message;
pub mod store;
pub mod task;

#[cfg(test)]
pub(crate) mod test_support;
