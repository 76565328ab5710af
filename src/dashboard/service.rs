//! Dashboard aggregation service.

use super::DashboardStats;
use crate::group::ports::{GroupRepository, GroupRepositoryError};
use crate::identity::domain::UserId;
use crate::message::ports::{MessageRepository, MessageRepositoryError};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Length of the "upcoming deadlines" window.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Errors raised while computing dashboard counters.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Group lookup failed.
    #[error(transparent)]
    Groups(#[from] GroupRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// Message lookup failed.
    #[error(transparent)]
    Messages(#[from] MessageRepositoryError),
}

/// Computes dashboard counters across the user's groups.
pub struct DashboardService<G, T, M, C>
where
    G: GroupRepository,
    T: TaskRepository,
    M: MessageRepository,
    C: Clock + Send + Sync,
{
    groups: Arc<G>,
    tasks: Arc<T>,
    messages: Arc<M>,
    clock: Arc<C>,
}

impl<G, T, M, C> DashboardService<G, T, M, C>
where
    G: GroupRepository,
    T: TaskRepository,
    M: MessageRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new dashboard service.
    #[must_use]
    pub const fn new(groups: Arc<G>, tasks: Arc<T>, messages: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            groups,
            tasks,
            messages,
            clock,
        }
    }

    /// Returns the counters for `user_id` at the current time.
    ///
    /// A user without memberships gets all zeros.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] when any repository lookup fails.
    pub async fn stats_for(&self, user_id: UserId) -> Result<DashboardStats, DashboardError> {
        let group_ids = self.groups.group_ids_for_user(user_id).await?;
        if group_ids.is_empty() {
            return Ok(DashboardStats::default());
        }

        let now = self.clock.utc();
        let until = now + Duration::days(UPCOMING_WINDOW_DAYS);
        let active_groups =
            u64::try_from(group_ids.len()).map_err(GroupRepositoryError::persistence)?;
        Ok(DashboardStats {
            active_groups,
            upcoming_deadlines: self.tasks.count_due_between(&group_ids, now, until).await?,
            new_messages: self.messages.count_unread_for(&group_ids, user_id).await?,
            tasks_completed: self.tasks.count_done(&group_ids).await?,
        })
    }
}
