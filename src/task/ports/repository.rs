//! Repository port for task persistence and aggregate queries.

use crate::group::domain::GroupId;
use crate::task::domain::{Task, TaskCounts, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task in the given groups, oldest first.
    async fn list_for_groups(&self, group_ids: &[GroupId]) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns total and done task counts for one group.
    async fn counts_for_group(&self, group_id: GroupId) -> TaskRepositoryResult<TaskCounts>;

    /// Counts open tasks in the given groups whose due date falls within
    /// `[from, until]`.
    async fn count_due_between(
        &self,
        group_ids: &[GroupId],
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> TaskRepositoryResult<u64>;

    /// Counts done tasks in the given groups.
    async fn count_done(&self, group_ids: &[GroupId]) -> TaskRepositoryResult<u64>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
