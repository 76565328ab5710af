//! Task board for ClassCollab study groups.
//!
//! Tasks belong to exactly one group and may be created, edited, completed,
//! or deleted by any member of that group. Every change counts as group
//! activity. The module follows hexagonal architecture:
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
