//! Member-scoped message operations.

use crate::group::{
    domain::GroupId,
    ports::{GroupRepository, GroupRepositoryError},
    services::{AccessControl, AccessError},
};
use crate::identity::domain::UserId;
use crate::message::{
    domain::{Message, MessageContent, MessageDomainError, MessageId, SentMessage},
    ports::{MessageRepository, MessageRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Message edit. Only the shared read flag is mutable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageChanges {
    /// Replacement read flag.
    pub is_read: Option<bool>,
}

/// Service-level errors for message operations.
#[derive(Debug, Error)]
pub enum MessageServiceError {
    /// Content validation failed.
    #[error(transparent)]
    Domain(#[from] MessageDomainError),

    /// The caller may not act on the message's group.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Message repository operation failed.
    #[error(transparent)]
    Repository(#[from] MessageRepositoryError),

    /// Group repository operation failed.
    #[error(transparent)]
    Groups(#[from] GroupRepositoryError),

    /// The message does not exist.
    #[error("message not found: {0}")]
    NotFound(MessageId),
}

/// Result type for message service operations.
pub type MessageServiceResult<T> = Result<T, MessageServiceError>;

/// Message log orchestration service.
pub struct MessageLogService<M, G, C>
where
    M: MessageRepository,
    G: GroupRepository,
    C: Clock + Send + Sync,
{
    messages: Arc<M>,
    groups: Arc<G>,
    access: AccessControl<G>,
    clock: Arc<C>,
}

impl<M, G, C> MessageLogService<M, G, C>
where
    M: MessageRepository,
    G: GroupRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new message log service.
    #[must_use]
    pub fn new(messages: Arc<M>, groups: Arc<G>, clock: Arc<C>) -> Self {
        let access = AccessControl::new(Arc::clone(&groups));
        Self {
            messages,
            groups,
            access,
            clock,
        }
    }

    /// Posts a message to a group the caller belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`MessageServiceError::Access`] when the group does not exist
    /// or the caller is not a member, and [`MessageServiceError::Domain`] for
    /// blank content.
    pub async fn create(
        &self,
        user_id: UserId,
        group_id: GroupId,
        content: impl Into<String> + Send,
    ) -> MessageServiceResult<SentMessage> {
        self.access.require_member(user_id, group_id).await?;
        let body = MessageContent::new(content)?;
        let message = Message::new(group_id, user_id, body, &*self.clock);
        self.messages.store(&message).await?;
        self.groups
            .record_activity(group_id, message.created_at())
            .await?;
        info!(message_id = %message.id(), group_id = %group_id, user_id = %user_id, "message posted");
        self.find(message.id()).await
    }

    /// Lists messages in the caller's groups, oldest first, optionally
    /// narrowed to one group.
    ///
    /// # Errors
    ///
    /// Returns [`MessageServiceError::Groups`] or
    /// [`MessageServiceError::Repository`] when a lookup fails.
    pub async fn list(
        &self,
        user_id: UserId,
        group_filter: Option<GroupId>,
    ) -> MessageServiceResult<Vec<SentMessage>> {
        let mut group_ids = self.groups.group_ids_for_user(user_id).await?;
        if let Some(wanted) = group_filter {
            group_ids.retain(|id| *id == wanted);
        }
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.messages.list_for_groups(&group_ids).await?)
    }

    /// Returns a message from one of the caller's groups.
    ///
    /// # Errors
    ///
    /// Returns [`MessageServiceError::NotFound`] for an unknown message and
    /// [`MessageServiceError::Access`] when the caller is not a member.
    pub async fn get(
        &self,
        user_id: UserId,
        message_id: MessageId,
    ) -> MessageServiceResult<SentMessage> {
        self.load_for_member(user_id, message_id).await
    }

    /// Applies a read-flag edit.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::get`].
    pub async fn update(
        &self,
        user_id: UserId,
        message_id: MessageId,
        changes: MessageChanges,
    ) -> MessageServiceResult<SentMessage> {
        let mut sent = self.load_for_member(user_id, message_id).await?;
        if let Some(is_read) = changes.is_read {
            sent.message.set_read(is_read);
            self.messages.update(&sent.message).await?;
            debug!(message_id = %message_id, is_read, "message read flag set");
        }
        Ok(sent)
    }

    /// Deletes a message.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::get`].
    pub async fn delete(&self, user_id: UserId, message_id: MessageId) -> MessageServiceResult<()> {
        self.load_for_member(user_id, message_id).await?;
        self.messages.delete(message_id).await?;
        info!(message_id = %message_id, user_id = %user_id, "message deleted");
        Ok(())
    }

    /// Marks a message read for the whole group.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::get`].
    pub async fn mark_read(
        &self,
        user_id: UserId,
        message_id: MessageId,
    ) -> MessageServiceResult<SentMessage> {
        let mut sent = self.load_for_member(user_id, message_id).await?;
        sent.message.mark_read();
        self.messages.update(&sent.message).await?;
        debug!(message_id = %message_id, user_id = %user_id, "message marked read");
        Ok(sent)
    }

    async fn find(&self, message_id: MessageId) -> MessageServiceResult<SentMessage> {
        self.messages
            .find_by_id(message_id)
            .await?
            .ok_or(MessageServiceError::NotFound(message_id))
    }

    async fn load_for_member(
        &self,
        user_id: UserId,
        message_id: MessageId,
    ) -> MessageServiceResult<SentMessage> {
        let sent = self.find(message_id).await?;
        self.access
            .require_member(user_id, sent.message.group_id())
            .await?;
        Ok(sent)
    }
}
