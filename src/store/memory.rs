//! In-memory relational store backing the in-memory repository adapters.
//!
//! All tables live behind a single lock so multi-table writes (group
//! creation with its admin membership, cascading deletes) are atomic.

use crate::group::domain::{Group, GroupId, Membership};
use crate::identity::domain::{TokenDigest, UserAccount, UserId};
use crate::message::domain::{Message, MessageId};
use crate::task::domain::{Task, TaskId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Error raised when a previous writer panicked while holding the lock.
#[derive(Debug, Clone, Error)]
#[error("in-memory store lock poisoned: {0}")]
pub struct StoreLockError(String);

/// Thread-safe handle to the in-memory tables.
///
/// Cloning the handle shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

/// Row storage for every aggregate.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: HashMap<UserId, UserAccount>,
    pub(crate) revoked_tokens: HashMap<TokenDigest, DateTime<Utc>>,
    pub(crate) groups: HashMap<GroupId, Group>,
    pub(crate) memberships: HashMap<(UserId, GroupId), Membership>,
    pub(crate) tasks: HashMap<TaskId, Task>,
    pub(crate) messages: HashMap<MessageId, Message>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreLockError> {
        self.tables
            .read()
            .map_err(|err| StoreLockError(err.to_string()))
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreLockError> {
        self.tables
            .write()
            .map_err(|err| StoreLockError(err.to_string()))
    }
}

impl Tables {
    /// Returns the identifiers of every group the user belongs to.
    pub(crate) fn group_ids_for(&self, user_id: UserId) -> Vec<GroupId> {
        self.memberships
            .keys()
            .filter(|(member, _)| *member == user_id)
            .map(|(_, group_id)| *group_id)
            .collect()
    }

    /// Removes a group together with its memberships, tasks, and messages.
    pub(crate) fn remove_group(&mut self, group_id: GroupId) -> Option<Group> {
        let removed = self.groups.remove(&group_id)?;
        self.memberships.retain(|(_, group), _| *group != group_id);
        self.tasks.retain(|_, task| task.group_id() != group_id);
        self.messages
            .retain(|_, message| message.group_id() != group_id);
        Some(removed)
    }

    /// Removes a user, their memberships and sent messages, and clears the
    /// assignee of any task assigned to them.
    pub(crate) fn remove_user(&mut self, user_id: UserId) -> Option<UserAccount> {
        let removed = self.users.remove(&user_id)?;
        self.memberships.retain(|(member, _), _| *member != user_id);
        self.messages
            .retain(|_, message| message.sender_id() != user_id);
        for task in self.tasks.values_mut() {
            if task.assigned_to() == Some(user_id) {
                task.unassign();
            }
        }
        Some(removed)
    }
}
