//! Membership relation between users and groups.

use super::{GroupId, ParseMembershipRoleError};
use crate::identity::domain::{UserId, Username};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Role a member holds within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipRole {
    /// May edit and delete the group.
    Admin,
    /// May read the group and manage its tasks and messages.
    Member,
}

impl MembershipRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
        }
    }
}

impl TryFrom<&str> for MembershipRole {
    type Error = ParseMembershipRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "MEMBER" => Ok(Self::Member),
            _ => Err(ParseMembershipRoleError(value.to_owned())),
        }
    }
}

/// A user's membership in a group. Unique per `(user, group)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    user_id: UserId,
    group_id: GroupId,
    role: MembershipRole,
    joined_at: DateTime<Utc>,
}

impl Membership {
    /// Creates a membership with the given role, joined now.
    #[must_use]
    pub fn new(
        user_id: UserId,
        group_id: GroupId,
        role: MembershipRole,
        clock: &impl Clock,
    ) -> Self {
        Self {
            user_id,
            group_id,
            role,
            joined_at: clock.utc(),
        }
    }

    /// Reconstructs a membership from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        user_id: UserId,
        group_id: GroupId,
        role: MembershipRole,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            group_id,
            role,
            joined_at,
        }
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the group identifier.
    #[must_use]
    pub const fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Returns the member's role.
    #[must_use]
    pub const fn role(&self) -> MembershipRole {
        self.role
    }

    /// Returns when the user joined.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    /// Returns `true` when the member is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == MembershipRole::Admin
    }
}

/// Member listing entry shown on the group detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupMember {
    /// Member's user identifier.
    pub id: UserId,
    /// Member's username.
    pub username: Username,
    /// Member's role.
    pub role: MembershipRole,
}
