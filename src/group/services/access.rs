//! Membership and role checks shared by every group-scoped service.

use crate::group::{
    domain::{GroupId, Membership},
    ports::{GroupRepository, GroupRepositoryError},
};
use crate::identity::domain::UserId;
use std::sync::Arc;
use thiserror::Error;

/// Reasons a caller may not act on a group.
#[derive(Debug, Clone, Error)]
pub enum AccessError {
    /// The group does not exist.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// The caller does not belong to the group.
    #[error("user {user_id} is not a member of group {group_id}")]
    NotMember {
        /// Calling user.
        user_id: UserId,
        /// Target group.
        group_id: GroupId,
    },

    /// The caller belongs to the group but is not an admin.
    #[error("user {user_id} is not an admin of group {group_id}")]
    NotAdmin {
        /// Calling user.
        user_id: UserId,
        /// Target group.
        group_id: GroupId,
    },

    /// Membership lookup failed.
    #[error(transparent)]
    Repository(#[from] GroupRepositoryError),
}

/// Lookup capability answering membership questions against the group
/// repository.
pub struct AccessControl<G>
where
    G: GroupRepository,
{
    groups: Arc<G>,
}

impl<G> Clone for AccessControl<G>
where
    G: GroupRepository,
{
    fn clone(&self) -> Self {
        Self {
            groups: Arc::clone(&self.groups),
        }
    }
}

impl<G> AccessControl<G>
where
    G: GroupRepository,
{
    /// Creates an access checker over the group repository.
    #[must_use]
    pub const fn new(groups: Arc<G>) -> Self {
        Self { groups }
    }

    /// Returns `true` when the user holds any membership in the group.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError`] when the lookup fails.
    pub async fn is_member(
        &self,
        user_id: UserId,
        group_id: GroupId,
    ) -> Result<bool, GroupRepositoryError> {
        let membership = self.groups.find_membership(user_id, group_id).await?;
        Ok(membership.is_some())
    }

    /// Returns `true` when the user is an admin of the group.
    ///
    /// # Errors
    ///
    /// Returns [`GroupRepositoryError`] when the lookup fails.
    pub async fn is_admin(
        &self,
        user_id: UserId,
        group_id: GroupId,
    ) -> Result<bool, GroupRepositoryError> {
        let membership = self.groups.find_membership(user_id, group_id).await?;
        Ok(membership.is_some_and(|found| found.is_admin()))
    }

    /// Requires the user to be a member of an existing group.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::GroupNotFound`] when the group does not exist
    /// and [`AccessError::NotMember`] when the user does not belong to it.
    pub async fn require_member(
        &self,
        user_id: UserId,
        group_id: GroupId,
    ) -> Result<Membership, AccessError> {
        if let Some(membership) = self.groups.find_membership(user_id, group_id).await? {
            return Ok(membership);
        }
        if self.groups.find_by_id(group_id).await?.is_none() {
            return Err(AccessError::GroupNotFound(group_id));
        }
        Err(AccessError::NotMember { user_id, group_id })
    }

    /// Requires the user to be an admin of an existing group.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::require_member`], or
    /// [`AccessError::NotAdmin`] when the membership is not an admin one.
    pub async fn require_admin(
        &self,
        user_id: UserId,
        group_id: GroupId,
    ) -> Result<Membership, AccessError> {
        let membership = self.require_member(user_id, group_id).await?;
        if membership.is_admin() {
            Ok(membership)
        } else {
            Err(AccessError::NotAdmin { user_id, group_id })
        }
    }
}
