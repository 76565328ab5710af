//! Group registry service: creation, listing, joining, and administration.

use super::access::{AccessControl, AccessError};
use crate::group::{
    domain::{
        Group, GroupDomainError, GroupId, GroupMember, GroupProfile, InviteCode, Membership,
        MembershipRole, describe_elapsed,
    },
    ports::{GroupRepository, GroupRepositoryError, InviteCodeGenerator},
};
use crate::identity::domain::UserId;
use crate::task::{
    domain::Task,
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Maximum number of invite codes tried before group creation gives up.
pub const MAX_INVITE_CODE_ATTEMPTS: usize = 32;

/// Raw descriptive fields supplied when creating or fully replacing a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFields {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Course subject.
    pub subject: String,
    /// Academic term.
    pub semester: String,
}

/// Partial group edit; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupChanges {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement course subject.
    pub subject: Option<String>,
    /// Replacement academic term.
    pub semester: Option<String>,
}

impl From<GroupFields> for GroupChanges {
    fn from(fields: GroupFields) -> Self {
        Self {
            name: Some(fields.name),
            description: Some(fields.description),
            subject: Some(fields.subject),
            semester: Some(fields.semester),
        }
    }
}

impl GroupChanges {
    fn apply_to(self, current: &GroupProfile) -> Result<GroupProfile, GroupDomainError> {
        GroupProfile::new(
            self.name.unwrap_or_else(|| current.name().to_owned()),
            self.description
                .unwrap_or_else(|| current.description().to_owned()),
            self.subject.unwrap_or_else(|| current.subject().to_owned()),
            self.semester
                .unwrap_or_else(|| current.semester().to_owned()),
        )
    }
}

/// Group list entry annotated with counts and a relative activity string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    /// The group.
    pub group: Group,
    /// Number of members.
    pub members_count: u64,
    /// Number of tasks.
    pub tasks_count: u64,
    /// Number of done tasks.
    pub tasks_completed_count: u64,
    /// Relative description of `last_activity`.
    pub recent_activity: String,
}

/// Full view of one group for its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDetail {
    /// The group, including its invite code.
    pub group: Group,
    /// Members, earliest joiner first.
    pub members: Vec<GroupMember>,
    /// Tasks, oldest first.
    pub tasks: Vec<Task>,
}

/// Service-level errors for group registry operations.
#[derive(Debug, Error)]
pub enum GroupServiceError {
    /// Field validation failed.
    #[error(transparent)]
    Domain(#[from] GroupDomainError),

    /// The caller may not act on the group.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Group repository operation failed.
    #[error(transparent)]
    Repository(#[from] GroupRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// The join request carried no invite code.
    #[error("Invite code is required")]
    MissingInviteCode,

    /// No group uses the supplied invite code.
    #[error("Invalid invite code")]
    UnknownInviteCode,

    /// The caller already belongs to the group.
    #[error("You are already a member of this group")]
    AlreadyMember(GroupId),

    /// Every generated invite code collided with an existing one.
    #[error("could not allocate a unique invite code after {attempts} attempts")]
    InviteCodesExhausted {
        /// Number of codes tried.
        attempts: usize,
    },
}

/// Result type for group registry operations.
pub type GroupServiceResult<T> = Result<T, GroupServiceError>;

/// Group registry orchestration service.
pub struct GroupRegistryService<G, T, C>
where
    G: GroupRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    groups: Arc<G>,
    tasks: Arc<T>,
    access: AccessControl<G>,
    codes: Arc<dyn InviteCodeGenerator>,
    clock: Arc<C>,
}

impl<G, T, C> GroupRegistryService<G, T, C>
where
    G: GroupRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new group registry service.
    #[must_use]
    pub fn new(
        groups: Arc<G>,
        tasks: Arc<T>,
        codes: Arc<dyn InviteCodeGenerator>,
        clock: Arc<C>,
    ) -> Self {
        let access = AccessControl::new(Arc::clone(&groups));
        Self {
            groups,
            tasks,
            access,
            codes,
            clock,
        }
    }

    /// Returns the membership checker backing this service.
    #[must_use]
    pub const fn access(&self) -> &AccessControl<G> {
        &self.access
    }

    /// Creates a group with a fresh invite code and makes the creator its
    /// admin.
    ///
    /// # Errors
    ///
    /// Returns [`GroupServiceError::Domain`] for invalid fields and
    /// [`GroupServiceError::InviteCodesExhausted`] when no unique invite code
    /// could be found.
    pub async fn create(
        &self,
        creator: UserId,
        fields: GroupFields,
    ) -> GroupServiceResult<Group> {
        let profile = GroupProfile::new(
            fields.name,
            fields.description,
            fields.subject,
            fields.semester,
        )?;

        for _ in 0..MAX_INVITE_CODE_ATTEMPTS {
            let code = self.codes.generate();
            if self.groups.find_by_invite_code(&code).await?.is_some() {
                debug!(invite_code = %code, "invite code already taken, retrying");
                continue;
            }

            let group = Group::new(profile.clone(), code, &*self.clock);
            let founder = Membership::new(creator, group.id(), MembershipRole::Admin, &*self.clock);
            match self.groups.create_with_founder(&group, &founder).await {
                Ok(()) => {
                    info!(group_id = %group.id(), creator = %creator, "group created");
                    return Ok(group);
                }
                Err(GroupRepositoryError::DuplicateInviteCode(taken)) => {
                    debug!(invite_code = %taken, "invite code collided on insert, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(GroupServiceError::InviteCodesExhausted {
            attempts: MAX_INVITE_CODE_ATTEMPTS,
        })
    }

    /// Lists the caller's groups, most recently active first.
    ///
    /// # Errors
    ///
    /// Returns [`GroupServiceError::Repository`] or
    /// [`GroupServiceError::Tasks`] when a lookup fails.
    pub async fn list_for_user(&self, user_id: UserId) -> GroupServiceResult<Vec<GroupSummary>> {
        let now = self.clock.utc();
        let groups = self.groups.list_for_user(user_id).await?;
        let mut summaries = Vec::with_capacity(groups.len());
        for group in groups {
            let members_count = self.groups.count_members(group.id()).await?;
            let counts = self.tasks.counts_for_group(group.id()).await?;
            let recent_activity = describe_elapsed(group.last_activity(), now);
            summaries.push(GroupSummary {
                group,
                members_count,
                tasks_count: counts.total,
                tasks_completed_count: counts.done,
                recent_activity,
            });
        }
        Ok(summaries)
    }

    /// Returns the group with its members and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`GroupServiceError::Access`] when the group does not exist or
    /// the caller is not a member.
    pub async fn detail(&self, user_id: UserId, group_id: GroupId) -> GroupServiceResult<GroupDetail> {
        self.access.require_member(user_id, group_id).await?;
        self.load_detail(group_id).await
    }

    /// Adds the caller to the group using the invite code.
    ///
    /// # Errors
    ///
    /// Returns [`GroupServiceError::MissingInviteCode`] for a blank code,
    /// [`GroupServiceError::UnknownInviteCode`] when no group matches, and
    /// [`GroupServiceError::AlreadyMember`] when the caller already belongs to
    /// the group.
    pub async fn join(&self, user_id: UserId, invite_code: &str) -> GroupServiceResult<Group> {
        if invite_code.trim().is_empty() {
            return Err(GroupServiceError::MissingInviteCode);
        }
        let code = InviteCode::new(invite_code).map_err(|_| GroupServiceError::UnknownInviteCode)?;
        let group = self
            .groups
            .find_by_invite_code(&code)
            .await?
            .ok_or(GroupServiceError::UnknownInviteCode)?;

        if self.access.is_member(user_id, group.id()).await? {
            return Err(GroupServiceError::AlreadyMember(group.id()));
        }

        let membership = Membership::new(user_id, group.id(), MembershipRole::Member, &*self.clock);
        match self.groups.add_membership(&membership).await {
            Ok(()) => {}
            Err(GroupRepositoryError::DuplicateMembership { group_id, .. }) => {
                return Err(GroupServiceError::AlreadyMember(group_id));
            }
            Err(err) => return Err(err.into()),
        }

        info!(group_id = %group.id(), user_id = %user_id, "member joined group");
        Ok(group)
    }

    /// Edits the group's descriptive fields. Admins only.
    ///
    /// Pass [`GroupChanges::from`] a full [`GroupFields`] for a complete
    /// replacement.
    ///
    /// # Errors
    ///
    /// Returns [`GroupServiceError::Access`] when the caller is not an admin
    /// and [`GroupServiceError::Domain`] when a merged field is invalid.
    pub async fn update(
        &self,
        user_id: UserId,
        group_id: GroupId,
        changes: GroupChanges,
    ) -> GroupServiceResult<GroupDetail> {
        self.access.require_admin(user_id, group_id).await?;
        let mut group = self.find_group(group_id).await?;
        let profile = changes.apply_to(group.profile())?;
        group.update_profile(profile, &*self.clock);
        self.groups.update(&group).await?;
        info!(group_id = %group_id, user_id = %user_id, "group updated");
        self.load_detail(group_id).await
    }

    /// Deletes the group with its memberships, tasks, and messages. Admins
    /// only.
    ///
    /// # Errors
    ///
    /// Returns [`GroupServiceError::Access`] when the caller is not an admin.
    pub async fn delete(&self, user_id: UserId, group_id: GroupId) -> GroupServiceResult<()> {
        self.access.require_admin(user_id, group_id).await?;
        self.groups.delete(group_id).await?;
        info!(group_id = %group_id, user_id = %user_id, "group deleted");
        Ok(())
    }

    async fn find_group(&self, group_id: GroupId) -> GroupServiceResult<Group> {
        self.groups
            .find_by_id(group_id)
            .await?
            .ok_or(GroupServiceError::Access(AccessError::GroupNotFound(group_id)))
    }

    async fn load_detail(&self, group_id: GroupId) -> GroupServiceResult<GroupDetail> {
        let group = self.find_group(group_id).await?;
        let members = self.groups.list_members(group_id).await?;
        let tasks = self.tasks.list_for_groups(&[group_id]).await?;
        Ok(GroupDetail {
            group,
            members,
            tasks,
        })
    }
}
