//! In-memory group repository backed by the shared store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::group::{
    domain::{Group, GroupId, GroupMember, InviteCode, Membership},
    ports::{GroupRepository, GroupRepositoryError, GroupRepositoryResult},
};
use crate::identity::domain::UserId;
use crate::store::memory::InMemoryStore;

/// Thread-safe in-memory group repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupRepository {
    store: InMemoryStore,
}

impl InMemoryGroupRepository {
    /// Creates a repository over the given store.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn create_with_founder(
        &self,
        group: &Group,
        founder: &Membership,
    ) -> GroupRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(GroupRepositoryError::persistence)?;
        if tables.groups.contains_key(&group.id()) {
            return Err(GroupRepositoryError::DuplicateGroup(group.id()));
        }
        let code_taken = tables
            .groups
            .values()
            .any(|existing| existing.invite_code() == group.invite_code());
        if code_taken {
            return Err(GroupRepositoryError::DuplicateInviteCode(
                group.invite_code().clone(),
            ));
        }

        tables.groups.insert(group.id(), group.clone());
        tables
            .memberships
            .insert((founder.user_id(), founder.group_id()), founder.clone());
        Ok(())
    }

    async fn update(&self, group: &Group) -> GroupRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(GroupRepositoryError::persistence)?;
        let slot = tables
            .groups
            .get_mut(&group.id())
            .ok_or(GroupRepositoryError::NotFound(group.id()))?;
        *slot = group.clone();
        Ok(())
    }

    async fn delete(&self, id: GroupId) -> GroupRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(GroupRepositoryError::persistence)?;
        tables
            .remove_group(id)
            .map(|_| ())
            .ok_or(GroupRepositoryError::NotFound(id))
    }

    async fn record_activity(&self, id: GroupId, at: DateTime<Utc>) -> GroupRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(GroupRepositoryError::persistence)?;
        let group = tables
            .groups
            .get_mut(&id)
            .ok_or(GroupRepositoryError::NotFound(id))?;
        group.record_activity(at);
        Ok(())
    }

    async fn find_by_id(&self, id: GroupId) -> GroupRepositoryResult<Option<Group>> {
        let tables = self
            .store
            .read()
            .map_err(GroupRepositoryError::persistence)?;
        Ok(tables.groups.get(&id).cloned())
    }

    async fn find_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> GroupRepositoryResult<Option<Group>> {
        let tables = self
            .store
            .read()
            .map_err(GroupRepositoryError::persistence)?;
        Ok(tables
            .groups
            .values()
            .find(|group| group.invite_code() == code)
            .cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> GroupRepositoryResult<Vec<Group>> {
        let tables = self
            .store
            .read()
            .map_err(GroupRepositoryError::persistence)?;
        let mut groups: Vec<Group> = tables
            .group_ids_for(user_id)
            .into_iter()
            .filter_map(|id| tables.groups.get(&id).cloned())
            .collect();
        groups.sort_by(|left, right| {
            right
                .last_activity()
                .cmp(&left.last_activity())
                .then_with(|| left.id().cmp(&right.id()))
        });
        Ok(groups)
    }

    async fn add_membership(&self, membership: &Membership) -> GroupRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(GroupRepositoryError::persistence)?;
        if !tables.groups.contains_key(&membership.group_id()) {
            return Err(GroupRepositoryError::NotFound(membership.group_id()));
        }
        let key = (membership.user_id(), membership.group_id());
        if tables.memberships.contains_key(&key) {
            return Err(GroupRepositoryError::DuplicateMembership {
                user_id: membership.user_id(),
                group_id: membership.group_id(),
            });
        }
        tables.memberships.insert(key, membership.clone());
        Ok(())
    }

    async fn find_membership(
        &self,
        user_id: UserId,
        group_id: GroupId,
    ) -> GroupRepositoryResult<Option<Membership>> {
        let tables = self
            .store
            .read()
            .map_err(GroupRepositoryError::persistence)?;
        Ok(tables.memberships.get(&(user_id, group_id)).cloned())
    }

    async fn list_members(&self, group_id: GroupId) -> GroupRepositoryResult<Vec<GroupMember>> {
        let tables = self
            .store
            .read()
            .map_err(GroupRepositoryError::persistence)?;
        let mut memberships: Vec<&Membership> = tables
            .memberships
            .values()
            .filter(|membership| membership.group_id() == group_id)
            .collect();
        memberships.sort_by_key(|membership| (membership.joined_at(), membership.user_id()));

        let members = memberships
            .into_iter()
            .filter_map(|membership| {
                tables
                    .users
                    .get(&membership.user_id())
                    .map(|account| GroupMember {
                        id: membership.user_id(),
                        username: account.user().username().clone(),
                        role: membership.role(),
                    })
            })
            .collect();
        Ok(members)
    }

    async fn count_members(&self, group_id: GroupId) -> GroupRepositoryResult<u64> {
        let tables = self
            .store
            .read()
            .map_err(GroupRepositoryError::persistence)?;
        let count = tables
            .memberships
            .keys()
            .filter(|(_, group)| *group == group_id)
            .count();
        u64::try_from(count).map_err(GroupRepositoryError::persistence)
    }

    async fn group_ids_for_user(&self, user_id: UserId) -> GroupRepositoryResult<Vec<GroupId>> {
        let tables = self
            .store
            .read()
            .map_err(GroupRepositoryError::persistence)?;
        Ok(tables.group_ids_for(user_id))
    }
}
