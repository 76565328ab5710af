//! Diesel row models for task persistence.

use crate::store::postgres::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Owning group.
    pub group_id: Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Optional assignee.
    pub assigned_to: Option<Uuid>,
    /// Progress status.
    pub status: String,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Owning group.
    pub group_id: Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Optional assignee.
    pub assigned_to: Option<Uuid>,
    /// Progress status.
    pub status: String,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Changeset for the mutable task columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Optional assignee.
    pub assigned_to: Option<Uuid>,
    /// Progress status.
    pub status: String,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}
