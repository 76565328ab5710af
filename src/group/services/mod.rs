//! Application services for the group registry.

pub mod access;
mod registry;

pub use access::{AccessControl, AccessError};
pub use registry::{
    GroupChanges, GroupDetail, GroupFields, GroupRegistryService, GroupServiceError,
    GroupServiceResult, GroupSummary, MAX_INVITE_CODE_ATTEMPTS,
};
