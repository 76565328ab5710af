//! `PostgreSQL` repository implementation for message storage.

use super::models::MessageRow;
use crate::group::domain::GroupId;
use crate::identity::domain::{UserId, Username};
use crate::message::{
    domain::{Message, MessageContent, MessageId, PersistedMessageData, SentMessage},
    ports::{MessageRepository, MessageRepositoryError, MessageRepositoryResult},
};
use crate::store::postgres::{
    PersistenceFailure, PgPool, count_to_u64, run_blocking,
    schema::{messages, users},
    unique_violation,
};
use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use uuid::Uuid;

/// `PostgreSQL`-backed message repository.
#[derive(Debug, Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PersistenceFailure for MessageRepositoryError {
    fn from_failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn store(&self, message: &Message) -> MessageRepositoryResult<()> {
        let message_id = message.id();
        let row = to_row(message);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(messages::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| {
                    if unique_violation(&err).is_some() {
                        MessageRepositoryError::DuplicateMessage(message_id)
                    } else {
                        MessageRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, message: &Message) -> MessageRepositoryResult<()> {
        let message_id = message.id();
        let is_read = message.is_read();
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(messages::table.find(message_id.into_inner()))
                .set(messages::is_read.eq(is_read))
                .execute(connection)
                .map_err(MessageRepositoryError::persistence)?;
            if updated == 0 {
                return Err(MessageRepositoryError::NotFound(message_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: MessageId) -> MessageRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            let deleted = diesel::delete(messages::table.find(id.into_inner()))
                .execute(connection)
                .map_err(MessageRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(MessageRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: MessageId) -> MessageRepositoryResult<Option<SentMessage>> {
        run_blocking(&self.pool, move |connection| {
            let row = messages::table
                .inner_join(users::table)
                .filter(messages::id.eq(id.into_inner()))
                .select((MessageRow::as_select(), users::username))
                .first::<(MessageRow, String)>(connection)
                .optional()
                .map_err(MessageRepositoryError::persistence)?;
            row.map(row_to_sent_message).transpose()
        })
        .await
    }

    async fn list_for_groups(
        &self,
        group_ids: &[GroupId],
    ) -> MessageRepositoryResult<Vec<SentMessage>> {
        let ids: Vec<Uuid> = group_ids.iter().map(|id| id.into_inner()).collect();
        run_blocking(&self.pool, move |connection| {
            let rows = messages::table
                .inner_join(users::table)
                .filter(messages::group_id.eq_any(ids))
                .order((messages::created_at.asc(), messages::id.asc()))
                .select((MessageRow::as_select(), users::username))
                .load::<(MessageRow, String)>(connection)
                .map_err(MessageRepositoryError::persistence)?;
            rows.into_iter().map(row_to_sent_message).collect()
        })
        .await
    }

    async fn count_unread_for(
        &self,
        group_ids: &[GroupId],
        reader: UserId,
    ) -> MessageRepositoryResult<u64> {
        let ids: Vec<Uuid> = group_ids.iter().map(|id| id.into_inner()).collect();
        run_blocking(&self.pool, move |connection| {
            let count = messages::table
                .filter(messages::group_id.eq_any(ids))
                .filter(messages::is_read.eq(false))
                .filter(messages::sender_id.ne(reader.into_inner()))
                .select(count_star())
                .first::<i64>(connection)
                .map_err(MessageRepositoryError::persistence)?;
            count_to_u64(count)
        })
        .await
    }
}

fn to_row(message: &Message) -> MessageRow {
    MessageRow {
        id: message.id().into_inner(),
        group_id: message.group_id().into_inner(),
        sender_id: message.sender_id().into_inner(),
        content: message.content().as_str().to_owned(),
        created_at: message.created_at(),
        is_read: message.is_read(),
    }
}

fn row_to_sent_message(
    (row, username): (MessageRow, String),
) -> MessageRepositoryResult<SentMessage> {
    let content = MessageContent::new(row.content).map_err(MessageRepositoryError::persistence)?;
    let sender_name = Username::new(username).map_err(MessageRepositoryError::persistence)?;
    let message = Message::from_persisted(PersistedMessageData {
        id: MessageId::from_uuid(row.id),
        group_id: GroupId::from_uuid(row.group_id),
        sender_id: UserId::from_uuid(row.sender_id),
        content,
        created_at: row.created_at,
        is_read: row.is_read,
    });
    Ok(SentMessage {
        message,
        sender_name,
    })
}
