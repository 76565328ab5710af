//! Port contracts for the group registry.
//!
//! Ports define infrastructure-agnostic interfaces used by group services.

pub mod invite;
pub mod repository;

pub use invite::InviteCodeGenerator;
pub use repository::{GroupRepository, GroupRepositoryError, GroupRepositoryResult};
