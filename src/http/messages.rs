//! Message log routes under `/messages`.

use super::tasks::GroupFilter;
use super::{ApiError, AppState, Authenticated, IdPath, JsonBody, QueryParams};
use crate::app::Backend;
use crate::group::domain::GroupId;
use crate::identity::domain::{UserId, Username};
use crate::message::domain::{MessageId, SentMessage};
use crate::message::services::MessageChanges;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(super) fn routes<B, C>() -> Router<AppState<B, C>>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/messages", get(list::<B, C>).post(create::<B, C>))
        .route(
            "/messages/{id}",
            get(retrieve::<B, C>)
                .put(update::<B, C>)
                .patch(update::<B, C>)
                .delete(destroy::<B, C>),
        )
        .route("/messages/{id}/mark_read", post(mark_read::<B, C>))
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    id: MessageId,
    group: GroupId,
    content: String,
    sender: UserId,
    sender_name: Username,
    created_at: DateTime<Utc>,
    is_read: bool,
}

impl From<SentMessage> for MessageResponse {
    fn from(sent: SentMessage) -> Self {
        let message = sent.message;
        Self {
            id: message.id(),
            group: message.group_id(),
            content: message.content().as_str().to_owned(),
            sender: message.sender_id(),
            sender_name: sent.sender_name,
            created_at: message.created_at(),
            is_read: message.is_read(),
        }
    }
}

#[derive(Deserialize)]
struct CreateMessageBody {
    group: Uuid,
    #[serde(default)]
    content: String,
}

/// Content is immutable, so both `PUT` and `PATCH` only touch the read flag.
#[derive(Deserialize)]
struct UpdateMessageBody {
    #[serde(default)]
    is_read: Option<bool>,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
}

async fn list<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    QueryParams(filter): QueryParams<GroupFilter>,
) -> Result<Json<Vec<MessageResponse>>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let messages = state
        .messages
        .list(caller.user.id(), filter.group.map(GroupId::from_uuid))
        .await?;
    Ok(Json(
        messages.into_iter().map(MessageResponse::from).collect(),
    ))
}

async fn create<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    JsonBody(body): JsonBody<CreateMessageBody>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let sent = state
        .messages
        .create(caller.user.id(), GroupId::from_uuid(body.group), body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(sent.into())))
}

async fn retrieve<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let sent = state
        .messages
        .get(caller.user.id(), MessageId::from_uuid(id))
        .await?;
    Ok(Json(sent.into()))
}

async fn update<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<UpdateMessageBody>,
) -> Result<Json<MessageResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let changes = MessageChanges {
        is_read: body.is_read,
    };
    let sent = state
        .messages
        .update(caller.user.id(), MessageId::from_uuid(id), changes)
        .await?;
    Ok(Json(sent.into()))
}

async fn destroy<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    state
        .messages
        .delete(caller.user.id(), MessageId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_read<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    IdPath(id): IdPath,
) -> Result<Json<StatusResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    state
        .messages
        .mark_read(caller.user.id(), MessageId::from_uuid(id))
        .await?;
    Ok(Json(StatusResponse {
        status: "Message marked as read",
    }))
}
