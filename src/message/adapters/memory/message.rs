//! In-memory message repository backed by the shared store.

use async_trait::async_trait;

use crate::group::domain::GroupId;
use crate::identity::domain::UserId;
use crate::message::{
    domain::{Message, MessageId, SentMessage},
    ports::{MessageRepository, MessageRepositoryError, MessageRepositoryResult},
};
use crate::store::memory::{InMemoryStore, Tables};

/// Thread-safe in-memory message repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageRepository {
    store: InMemoryStore,
}

impl InMemoryMessageRepository {
    /// Creates a repository over the given store.
    #[must_use]
    pub const fn new(store: InMemoryStore) -> Self {
        Self { store }
    }
}

fn with_sender(tables: &Tables, message: &Message) -> MessageRepositoryResult<SentMessage> {
    let sender = tables.users.get(&message.sender_id()).ok_or_else(|| {
        MessageRepositoryError::persistence(std::io::Error::other(format!(
            "sender {} of message {} is missing",
            message.sender_id(),
            message.id()
        )))
    })?;
    Ok(SentMessage {
        message: message.clone(),
        sender_name: sender.user().username().clone(),
    })
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn store(&self, message: &Message) -> MessageRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(MessageRepositoryError::persistence)?;
        if tables.messages.contains_key(&message.id()) {
            return Err(MessageRepositoryError::DuplicateMessage(message.id()));
        }
        tables.messages.insert(message.id(), message.clone());
        Ok(())
    }

    async fn update(&self, message: &Message) -> MessageRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(MessageRepositoryError::persistence)?;
        let slot = tables
            .messages
            .get_mut(&message.id())
            .ok_or(MessageRepositoryError::NotFound(message.id()))?;
        slot.set_read(message.is_read());
        Ok(())
    }

    async fn delete(&self, id: MessageId) -> MessageRepositoryResult<()> {
        let mut tables = self
            .store
            .write()
            .map_err(MessageRepositoryError::persistence)?;
        tables
            .messages
            .remove(&id)
            .map(|_| ())
            .ok_or(MessageRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: MessageId) -> MessageRepositoryResult<Option<SentMessage>> {
        let tables = self
            .store
            .read()
            .map_err(MessageRepositoryError::persistence)?;
        tables
            .messages
            .get(&id)
            .map(|message| with_sender(&tables, message))
            .transpose()
    }

    async fn list_for_groups(
        &self,
        group_ids: &[GroupId],
    ) -> MessageRepositoryResult<Vec<SentMessage>> {
        let tables = self
            .store
            .read()
            .map_err(MessageRepositoryError::persistence)?;
        let mut messages: Vec<&Message> = tables
            .messages
            .values()
            .filter(|message| group_ids.contains(&message.group_id()))
            .collect();
        messages.sort_by_key(|message| (message.created_at(), message.id().into_inner()));
        messages
            .into_iter()
            .map(|message| with_sender(&tables, message))
            .collect()
    }

    async fn count_unread_for(
        &self,
        group_ids: &[GroupId],
        reader: UserId,
    ) -> MessageRepositoryResult<u64> {
        let tables = self
            .store
            .read()
            .map_err(MessageRepositoryError::persistence)?;
        let count = tables
            .messages
            .values()
            .filter(|message| {
                group_ids.contains(&message.group_id())
                    && !message.is_read()
                    && message.sender_id() != reader
            })
            .count();
        u64::try_from(count).map_err(MessageRepositoryError::persistence)
    }
}
