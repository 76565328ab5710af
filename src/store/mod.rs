//! Shared storage backends.
//!
//! Repository adapters in each module are thin views over one of these
//! stores, so relational rules that cross aggregates (cascading deletes,
//! membership-scoped queries) are enforced in one place.

pub mod memory;
pub mod postgres;
