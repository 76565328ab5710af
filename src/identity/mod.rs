//! Identity boundary for ClassCollab.
//!
//! Registers accounts, verifies credentials, and issues, validates, and
//! revokes bearer tokens. Every other module receives the authenticated
//! [`domain::User`] from here and references it by [`domain::UserId`]. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
