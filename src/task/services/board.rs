//! Member-scoped task operations.

use crate::group::{
    domain::GroupId,
    ports::{GroupRepository, GroupRepositoryError},
    services::{AccessControl, AccessError},
};
use crate::identity::domain::UserId;
use crate::task::{
    domain::{Task, TaskDetails, TaskDomainError, TaskId, TaskStatus, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a task in a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    group_id: GroupId,
    title: String,
    description: String,
    status: TaskStatus,
    due_date: Option<DateTime<Utc>>,
    assigned_to: Option<UserId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(group_id: GroupId, title: impl Into<String>) -> Self {
        Self {
            group_id,
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Todo,
            due_date: None,
            assigned_to: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }
}

/// Task edit. `None` keeps the current value; for the nullable fields
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement status.
    pub status: Option<TaskStatus>,
    /// Replacement or cleared deadline.
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Replacement or cleared assignee.
    pub assigned_to: Option<Option<UserId>>,
}

impl TaskChanges {
    fn apply_to(self, current: TaskDetails) -> Result<TaskDetails, TaskDomainError> {
        let title = match self.title {
            Some(title) => TaskTitle::new(title)?,
            None => current.title,
        };
        Ok(TaskDetails {
            title,
            description: self.description.unwrap_or(current.description),
            status: self.status.unwrap_or(current.status),
            due_date: self.due_date.unwrap_or(current.due_date),
            assigned_to: self.assigned_to.unwrap_or(current.assigned_to),
        })
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Field validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The caller may not act on the task's group.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Group repository operation failed.
    #[error(transparent)]
    Groups(#[from] GroupRepositoryError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The proposed assignee does not belong to the task's group.
    #[error("assignee {0} is not a member of this group")]
    AssigneeNotMember(UserId),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task board orchestration service.
pub struct TaskBoardService<T, G, C>
where
    T: TaskRepository,
    G: GroupRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    groups: Arc<G>,
    access: AccessControl<G>,
    clock: Arc<C>,
}

impl<T, G, C> TaskBoardService<T, G, C>
where
    T: TaskRepository,
    G: GroupRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task board service.
    #[must_use]
    pub fn new(tasks: Arc<T>, groups: Arc<G>, clock: Arc<C>) -> Self {
        let access = AccessControl::new(Arc::clone(&groups));
        Self {
            tasks,
            groups,
            access,
            clock,
        }
    }

    /// Creates a task in a group the caller belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Access`] when the group does not exist or
    /// the caller is not a member, [`TaskServiceError::Domain`] for an
    /// invalid title, and [`TaskServiceError::AssigneeNotMember`] when the
    /// assignee is outside the group.
    pub async fn create(
        &self,
        user_id: UserId,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let group_id = request.group_id;
        self.access.require_member(user_id, group_id).await?;
        let details = TaskDetails {
            title: TaskTitle::new(request.title)?,
            description: request.description,
            status: request.status,
            due_date: request.due_date,
            assigned_to: request.assigned_to,
        };
        self.ensure_assignee_is_member(details.assigned_to, group_id)
            .await?;

        let task = Task::new(group_id, details, &*self.clock);
        self.tasks.store(&task).await?;
        self.touch(group_id).await?;
        info!(task_id = %task.id(), group_id = %group_id, user_id = %user_id, "task created");
        Ok(task)
    }

    /// Lists tasks in the caller's groups, optionally narrowed to one group.
    ///
    /// Filtering on a group the caller does not belong to yields an empty
    /// list.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Groups`] or
    /// [`TaskServiceError::Repository`] when a lookup fails.
    pub async fn list(
        &self,
        user_id: UserId,
        group_filter: Option<GroupId>,
    ) -> TaskServiceResult<Vec<Task>> {
        let mut group_ids = self.groups.group_ids_for_user(user_id).await?;
        if let Some(wanted) = group_filter {
            group_ids.retain(|id| *id == wanted);
        }
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.tasks.list_for_groups(&group_ids).await?)
    }

    /// Returns a task from one of the caller's groups.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for an unknown task and
    /// [`TaskServiceError::Access`] when the caller is not a member.
    pub async fn get(&self, user_id: UserId, task_id: TaskId) -> TaskServiceResult<Task> {
        self.load_for_member(user_id, task_id).await
    }

    /// Edits a task. Any member may change status or assignment.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::get`], [`TaskServiceError::Domain`] for
    /// an invalid title, and [`TaskServiceError::AssigneeNotMember`] when the
    /// new assignee is outside the group.
    pub async fn update(
        &self,
        user_id: UserId,
        task_id: TaskId,
        changes: TaskChanges,
    ) -> TaskServiceResult<Task> {
        let mut task = self.load_for_member(user_id, task_id).await?;
        let assignee_changed = changes.assigned_to.is_some();
        let details = changes.apply_to(task.details())?;
        if assignee_changed {
            self.ensure_assignee_is_member(details.assigned_to, task.group_id())
                .await?;
        }

        task.revise(details, &*self.clock);
        self.tasks.update(&task).await?;
        self.touch(task.group_id()).await?;
        info!(task_id = %task_id, user_id = %user_id, status = task.status().as_str(), "task updated");
        Ok(task)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::get`].
    pub async fn delete(&self, user_id: UserId, task_id: TaskId) -> TaskServiceResult<()> {
        let task = self.load_for_member(user_id, task_id).await?;
        self.tasks.delete(task_id).await?;
        self.touch(task.group_id()).await?;
        info!(task_id = %task_id, user_id = %user_id, "task deleted");
        Ok(())
    }

    /// Marks a task done and stamps its completion time.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::get`].
    pub async fn mark_complete(&self, user_id: UserId, task_id: TaskId) -> TaskServiceResult<Task> {
        let mut task = self.load_for_member(user_id, task_id).await?;
        task.mark_complete(&*self.clock);
        self.tasks.update(&task).await?;
        self.touch(task.group_id()).await?;
        info!(task_id = %task_id, user_id = %user_id, "task completed");
        Ok(task)
    }

    async fn load_for_member(&self, user_id: UserId, task_id: TaskId) -> TaskServiceResult<Task> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::NotFound(task_id))?;
        self.access.require_member(user_id, task.group_id()).await?;
        Ok(task)
    }

    async fn ensure_assignee_is_member(
        &self,
        candidate: Option<UserId>,
        group_id: GroupId,
    ) -> TaskServiceResult<()> {
        let Some(assignee) = candidate else {
            return Ok(());
        };
        if self.access.is_member(assignee, group_id).await? {
            Ok(())
        } else {
            Err(TaskServiceError::AssigneeNotMember(assignee))
        }
    }

    async fn touch(&self, group_id: GroupId) -> TaskServiceResult<()> {
        self.groups
            .record_activity(group_id, self.clock.utc())
            .await?;
        Ok(())
    }
}
