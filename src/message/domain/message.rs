//! Message aggregate.

use super::{MessageContent, MessageId};
use crate::group::domain::GroupId;
use crate::identity::domain::{UserId, Username};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A message posted to a group.
///
/// Content is immutable once posted; only the shared read flag changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    group_id: GroupId,
    sender_id: UserId,
    content: MessageContent,
    created_at: DateTime<Utc>,
    is_read: bool,
}

/// Parameter object for reconstructing a persisted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMessageData {
    /// Persisted message identifier.
    pub id: MessageId,
    /// Persisted owning group.
    pub group_id: GroupId,
    /// Persisted sender.
    pub sender_id: UserId,
    /// Persisted body.
    pub content: MessageContent,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted read flag.
    pub is_read: bool,
}

impl Message {
    /// Creates an unread message.
    #[must_use]
    pub fn new(
        group_id: GroupId,
        sender_id: UserId,
        content: MessageContent,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: MessageId::new(),
            group_id,
            sender_id,
            content,
            created_at: clock.utc(),
            is_read: false,
        }
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            group_id: data.group_id,
            sender_id: data.sender_id,
            content: data.content,
            created_at: data.created_at,
            is_read: data.is_read,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the owning group.
    #[must_use]
    pub const fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Returns the sender.
    #[must_use]
    pub const fn sender_id(&self) -> UserId {
        self.sender_id
    }

    /// Returns the body.
    #[must_use]
    pub const fn content(&self) -> &MessageContent {
        &self.content
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the shared read flag.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Marks the message read for every member.
    pub const fn mark_read(&mut self) {
        self.is_read = true;
    }

    /// Sets the shared read flag.
    pub const fn set_read(&mut self, is_read: bool) {
        self.is_read = is_read;
    }
}

/// A message together with its sender's username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// The message.
    pub message: Message,
    /// Username of the sender.
    pub sender_name: Username,
}
