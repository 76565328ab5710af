//! Repository port for group and membership persistence.

use crate::group::domain::{Group, GroupId, GroupMember, InviteCode, Membership};
use crate::identity::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for group repository operations.
pub type GroupRepositoryResult<T> = Result<T, GroupRepositoryError>;

/// Group and membership persistence contract.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Stores a new group together with its founding membership in one
    /// atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::DuplicateInviteCode`] when another
    /// group already uses the invite code, or
    /// [`GroupRepositoryError::DuplicateGroup`] when the identifier exists.
    /// Neither row is written on failure.
    async fn create_with_founder(
        &self,
        group: &Group,
        founder: &Membership,
    ) -> GroupRepositoryResult<()>;

    /// Persists profile changes and activity timestamp of an existing group.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::NotFound`] when the group does not
    /// exist.
    async fn update(&self, group: &Group) -> GroupRepositoryResult<()>;

    /// Deletes a group together with its memberships, tasks, and messages.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::NotFound`] when the group does not
    /// exist.
    async fn delete(&self, id: GroupId) -> GroupRepositoryResult<()>;

    /// Advances a group's `last_activity` to `at` unless it is already
    /// later.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::NotFound`] when the group does not
    /// exist.
    async fn record_activity(&self, id: GroupId, at: DateTime<Utc>) -> GroupRepositoryResult<()>;

    /// Finds a group by identifier.
    async fn find_by_id(&self, id: GroupId) -> GroupRepositoryResult<Option<Group>>;

    /// Finds the group using an invite code.
    async fn find_by_invite_code(&self, code: &InviteCode)
    -> GroupRepositoryResult<Option<Group>>;

    /// Returns every group the user belongs to, most recently active first.
    async fn list_for_user(&self, user_id: UserId) -> GroupRepositoryResult<Vec<Group>>;

    /// Adds a membership to an existing group.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError::DuplicateMembership`] when the user
    /// already belongs to the group and [`GroupRepositoryError::NotFound`]
    /// when the group does not exist.
    async fn add_membership(&self, membership: &Membership) -> GroupRepositoryResult<()>;

    /// Finds the membership of a user in a group.
    async fn find_membership(
        &self,
        user_id: UserId,
        group_id: GroupId,
    ) -> GroupRepositoryResult<Option<Membership>>;

    /// Lists the members of a group with their usernames, earliest joiner
    /// first.
    async fn list_members(&self, group_id: GroupId) -> GroupRepositoryResult<Vec<GroupMember>>;

    /// Counts the members of a group.
    async fn count_members(&self, group_id: GroupId) -> GroupRepositoryResult<u64>;

    /// Returns the identifiers of every group the user belongs to.
    async fn group_ids_for_user(&self, user_id: UserId) -> GroupRepositoryResult<Vec<GroupId>>;
}

/// Errors returned by group repository implementations.
#[derive(Debug, Clone, Error)]
pub enum GroupRepositoryError {
    /// A group with the same identifier already exists.
    #[error("duplicate group identifier: {0}")]
    DuplicateGroup(GroupId),

    /// Another group already uses the invite code.
    #[error("duplicate invite code: {0}")]
    DuplicateInviteCode(InviteCode),

    /// The user already belongs to the group.
    #[error("user {user_id} is already a member of group {group_id}")]
    DuplicateMembership {
        /// Member user.
        user_id: UserId,
        /// Group joined.
        group_id: GroupId,
    },

    /// The group was not found.
    #[error("group not found: {0}")]
    NotFound(GroupId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl GroupRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
