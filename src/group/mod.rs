//! Study group registry and access control for ClassCollab.
//!
//! Owns groups and their memberships, issues invite codes, and answers the
//! "is member" and "is admin" questions every other module asks before it
//! mutates anything. The module follows hexagonal architecture:
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
