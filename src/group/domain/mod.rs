//! Domain model for study groups and memberships.
//!
//! A group exclusively owns its memberships; users are referenced by
//! identifier only.

mod activity;
mod error;
mod group;
mod ids;
mod membership;

pub use activity::describe_elapsed;
pub use error::{GroupDomainError, ParseMembershipRoleError};
pub use group::{Group, GroupProfile, PersistedGroupData};
pub use ids::{GroupId, INVITE_CODE_ALPHABET, INVITE_CODE_LENGTH, InviteCode};
pub use membership::{GroupMember, Membership, MembershipRole};
