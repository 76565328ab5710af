//! In-memory adapter for the group registry.

mod group;

pub use group::InMemoryGroupRepository;
