//! Repository port for message persistence.

use crate::group::domain::GroupId;
use crate::identity::domain::UserId;
use crate::message::domain::{Message, MessageId, SentMessage};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for message repository operations.
pub type MessageRepositoryResult<T> = Result<T, MessageRepositoryError>;

/// Message persistence contract.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Stores a new message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRepositoryError::DuplicateMessage`] when the ID
    /// already exists.
    async fn store(&self, message: &Message) -> MessageRepositoryResult<()>;

    /// Persists the read flag of an existing message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRepositoryError::NotFound`] when the message does not
    /// exist.
    async fn update(&self, message: &Message) -> MessageRepositoryResult<()>;

    /// Deletes a message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRepositoryError::NotFound`] when the message does not
    /// exist.
    async fn delete(&self, id: MessageId) -> MessageRepositoryResult<()>;

    /// Finds a message and its sender's username.
    async fn find_by_id(&self, id: MessageId) -> MessageRepositoryResult<Option<SentMessage>>;

    /// Lists messages in the given groups, oldest first.
    async fn list_for_groups(
        &self,
        group_ids: &[GroupId],
    ) -> MessageRepositoryResult<Vec<SentMessage>>;

    /// Counts unread messages in the given groups not sent by `reader`.
    async fn count_unread_for(
        &self,
        group_ids: &[GroupId],
        reader: UserId,
    ) -> MessageRepositoryResult<u64>;
}

/// Errors returned by message repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MessageRepositoryError {
    /// A message with the same identifier already exists.
    #[error("duplicate message identifier: {0}")]
    DuplicateMessage(MessageId),

    /// The message was not found.
    #[error("message not found: {0}")]
    NotFound(MessageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
