//! Task aggregate root and related status types.

use super::{ParseTaskStatusError, TaskId, TaskTitle};
use crate::group::domain::GroupId;
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task progress status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Todo,
    /// Work is under way.
    InProgress,
    /// Work is finished.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Returns `true` for statuses that still count towards deadlines.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Todo | Self::InProgress)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Member-editable fields of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    /// Task title.
    pub title: TaskTitle,
    /// Free-form description, possibly empty.
    pub description: String,
    /// Progress status.
    pub status: TaskStatus,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Optional assignee.
    pub assigned_to: Option<UserId>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    group_id: GroupId,
    title: TaskTitle,
    description: String,
    status: TaskStatus,
    due_date: Option<DateTime<Utc>>,
    assigned_to: Option<UserId>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning group.
    pub group_id: GroupId,
    /// Persisted editable fields.
    pub details: TaskDetails,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new task in a group.
    ///
    /// A task created directly as [`TaskStatus::Done`] is stamped complete.
    #[must_use]
    pub fn new(group_id: GroupId, details: TaskDetails, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let completed_at = (details.status == TaskStatus::Done).then_some(timestamp);
        Self {
            id: TaskId::new(),
            group_id,
            title: details.title,
            description: details.description,
            status: details.status,
            due_date: details.due_date,
            assigned_to: details.assigned_to,
            created_at: timestamp,
            completed_at,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            group_id: data.group_id,
            title: data.details.title,
            description: data.details.description,
            status: data.details.status,
            due_date: data.details.due_date,
            assigned_to: data.details.assigned_to,
            created_at: data.created_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning group.
    #[must_use]
    pub const fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the progress status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp, set while the task is done.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the current editable fields.
    #[must_use]
    pub fn details(&self) -> TaskDetails {
        TaskDetails {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            due_date: self.due_date,
            assigned_to: self.assigned_to,
        }
    }

    /// Replaces the editable fields.
    ///
    /// Moving into [`TaskStatus::Done`] stamps `completed_at`; moving out of
    /// it clears the stamp. Staying done keeps the original stamp.
    pub fn revise(&mut self, details: TaskDetails, clock: &impl Clock) {
        self.title = details.title;
        self.description = details.description;
        self.due_date = details.due_date;
        self.assigned_to = details.assigned_to;
        match (self.status, details.status) {
            (TaskStatus::Done, TaskStatus::Done) => {}
            (_, TaskStatus::Done) => self.completed_at = Some(clock.utc()),
            _ => self.completed_at = None,
        }
        self.status = details.status;
    }

    /// Marks the task done and stamps `completed_at` with the current time,
    /// even if it was already done.
    pub fn mark_complete(&mut self, clock: &impl Clock) {
        self.status = TaskStatus::Done;
        self.completed_at = Some(clock.utc());
    }

    /// Clears the assignee.
    pub const fn unassign(&mut self) {
        self.assigned_to = None;
    }
}

/// Task totals for a single group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    /// Number of tasks in the group.
    pub total: u64,
    /// Number of those tasks that are done.
    pub done: u64,
}
