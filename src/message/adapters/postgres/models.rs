//! Diesel row models for message persistence.

use crate::store::postgres::schema::messages;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result and insert row for messages.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Message identifier.
    pub id: Uuid,
    /// Owning group.
    pub group_id: Uuid,
    /// Sending user.
    pub sender_id: Uuid,
    /// Message body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Shared read flag.
    pub is_read: bool,
}
