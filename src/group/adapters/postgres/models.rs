//! Diesel row models for groups and memberships.

use crate::store::postgres::schema::{group_memberships, study_groups};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result row for study groups.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = study_groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroupRow {
    /// Group identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Course subject.
    pub subject: String,
    /// Academic term.
    pub semester: String,
    /// Invite code.
    pub invite_code: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest activity timestamp.
    pub last_activity: DateTime<Utc>,
}

/// Insert model for study groups.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = study_groups)]
pub struct NewGroupRow {
    /// Group identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Course subject.
    pub subject: String,
    /// Academic term.
    pub semester: String,
    /// Invite code.
    pub invite_code: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest activity timestamp.
    pub last_activity: DateTime<Utc>,
}

/// Changeset for editable group columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = study_groups)]
pub struct GroupChangeset {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Course subject.
    pub subject: String,
    /// Academic term.
    pub semester: String,
    /// Latest activity timestamp.
    pub last_activity: DateTime<Utc>,
}

/// Query result and insert row for memberships.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = group_memberships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MembershipRow {
    /// Member user.
    pub user_id: Uuid,
    /// Group joined.
    pub group_id: Uuid,
    /// Role name.
    pub role: String,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}
