//! Task board routes under `/tasks`.

use super::{ApiError, AppState, Authenticated, IdPath, JsonBody, QueryParams};
use crate::app::Backend;
use crate::group::domain::GroupId;
use crate::identity::domain::UserId;
use crate::task::domain::{Task, TaskId, TaskStatus};
use crate::task::services::{CreateTaskRequest, TaskChanges};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub(super) fn routes<B, C>() -> Router<AppState<B, C>>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/tasks", get(list::<B, C>).post(create::<B, C>))
        .route(
            "/tasks/{id}",
            get(retrieve::<B, C>)
                .put(replace::<B, C>)
                .patch(patch::<B, C>)
                .delete(destroy::<B, C>),
        )
        .route("/tasks/{id}/mark_complete", post(mark_complete::<B, C>))
}

/// Task as returned by the API.
#[derive(Debug, Serialize)]
pub(super) struct TaskResponse {
    id: TaskId,
    group: GroupId,
    title: String,
    description: String,
    status: TaskStatus,
    due_date: Option<DateTime<Utc>>,
    assigned_to: Option<UserId>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            group: task.group_id(),
            title: task.title().as_str().to_owned(),
            description: task.description().to_owned(),
            status: task.status(),
            due_date: task.due_date(),
            assigned_to: task.assigned_to(),
            created_at: task.created_at(),
            completed_at: task.completed_at(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct GroupFilter {
    pub(super) group: Option<Uuid>,
}

#[derive(Deserialize)]
struct CreateTaskBody {
    group: Uuid,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default)]
    due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    assigned_to: Option<Uuid>,
}

impl CreateTaskBody {
    fn into_request(self) -> CreateTaskRequest {
        let mut request = CreateTaskRequest::new(GroupId::from_uuid(self.group), self.title)
            .with_description(self.description)
            .with_status(self.status);
        if let Some(due_date) = self.due_date {
            request = request.with_due_date(due_date);
        }
        if let Some(assignee) = self.assigned_to {
            request = request.with_assignee(UserId::from_uuid(assignee));
        }
        request
    }
}

/// Full replacement. The title is required; omitted optional fields keep
/// their stored values and `null` clears a nullable one.
#[derive(Deserialize)]
struct ReplaceTaskBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "nullable")]
    due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    assigned_to: Option<Option<Uuid>>,
}

impl From<ReplaceTaskBody> for TaskChanges {
    fn from(body: ReplaceTaskBody) -> Self {
        Self {
            title: Some(body.title),
            description: body.description,
            status: body.status,
            due_date: body.due_date,
            assigned_to: body
                .assigned_to
                .map(|assignee| assignee.map(UserId::from_uuid)),
        }
    }
}

/// Partial edit; `null` clears a nullable field, absence keeps it.
#[derive(Deserialize)]
struct PatchTaskBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "nullable")]
    due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "nullable")]
    assigned_to: Option<Option<Uuid>>,
}

impl From<PatchTaskBody> for TaskChanges {
    fn from(body: PatchTaskBody) -> Self {
        Self {
            title: body.title,
            description: body.description,
            status: body.status,
            due_date: body.due_date,
            assigned_to: body
                .assigned_to
                .map(|assignee| assignee.map(UserId::from_uuid)),
        }
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
}

async fn list<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    QueryParams(filter): QueryParams<GroupFilter>,
) -> Result<Json<Vec<TaskResponse>>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let tasks = state
        .tasks
        .list(caller.user.id(), filter.group.map(GroupId::from_uuid))
        .await?;
    Ok(Json(tasks.iter().map(TaskResponse::from).collect()))
}

async fn create<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    JsonBody(body): JsonBody<CreateTaskBody>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let task = state
        .tasks
        .create(caller.user.id(), body.into_request())
        .await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

async fn retrieve<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    IdPath(id): IdPath,
) -> Result<Json<TaskResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let task = state
        .tasks
        .get(caller.user.id(), TaskId::from_uuid(id))
        .await?;
    Ok(Json(TaskResponse::from(&task)))
}

async fn replace<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<ReplaceTaskBody>,
) -> Result<Json<TaskResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let task = state
        .tasks
        .update(caller.user.id(), TaskId::from_uuid(id), body.into())
        .await?;
    Ok(Json(TaskResponse::from(&task)))
}

async fn patch<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<PatchTaskBody>,
) -> Result<Json<TaskResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let task = state
        .tasks
        .update(caller.user.id(), TaskId::from_uuid(id), body.into())
        .await?;
    Ok(Json(TaskResponse::from(&task)))
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
        .tasks
        .delete(caller.user.id(), TaskId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_complete<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    IdPath(id): IdPath,
) -> Result<Json<StatusResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    state
        .tasks
        .mark_complete(caller.user.id(), TaskId::from_uuid(id))
        .await?;
    Ok(Json(StatusResponse {
        status: "Task marked as complete",
    }))
}
