//! Port for producing candidate invite codes.

use crate::group::domain::InviteCode;

/// Source of candidate invite codes.
///
/// Candidates are not guaranteed unique; the registry retries when a code
/// is already taken.
pub trait InviteCodeGenerator: Send + Sync {
    /// Produces the next candidate code.
    fn generate(&self) -> InviteCode;
}
