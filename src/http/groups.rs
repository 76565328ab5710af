//! Group registry and dashboard routes under `/groups`.

use super::tasks::TaskResponse;
use super::{ApiError, AppState, Authenticated, IdPath, JsonBody};
use crate::app::Backend;
use crate::dashboard::DashboardStats;
use crate::group::domain::{Group, GroupId, GroupMember, InviteCode};
use crate::group::services::{GroupChanges, GroupDetail, GroupFields, GroupSummary};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use mockable::Clock;
use serde::{Deserialize, Serialize};

pub(super) fn routes<B, C>() -> Router<AppState<B, C>>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/groups", get(list::<B, C>).post(create::<B, C>))
        .route("/groups/dashboard_stats", get(dashboard_stats::<B, C>))
        .route("/groups/join", post(join::<B, C>))
        .route(
            "/groups/{id}",
            get(retrieve::<B, C>)
                .put(replace::<B, C>)
                .patch(patch::<B, C>)
                .delete(destroy::<B, C>),
        )
}

#[derive(Deserialize)]
struct GroupBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    semester: String,
}

impl From<GroupBody> for GroupFields {
    fn from(body: GroupBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            subject: body.subject,
            semester: body.semester,
        }
    }
}

#[derive(Deserialize)]
struct PatchGroupBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    semester: Option<String>,
}

impl From<PatchGroupBody> for GroupChanges {
    fn from(body: PatchGroupBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            subject: body.subject,
            semester: body.semester,
        }
    }
}

#[derive(Deserialize)]
struct JoinBody {
    #[serde(default)]
    invite_code: Option<String>,
}

#[derive(Debug, Serialize)]
struct GroupCreatedResponse {
    id: GroupId,
    name: String,
    description: String,
    subject: String,
    semester: String,
    invite_code: InviteCode,
}

impl From<Group> for GroupCreatedResponse {
    fn from(group: Group) -> Self {
        let profile = group.profile();
        Self {
            id: group.id(),
            name: profile.name().to_owned(),
            description: profile.description().to_owned(),
            subject: profile.subject().to_owned(),
            semester: profile.semester().to_owned(),
            invite_code: group.invite_code().clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct GroupListEntry {
    id: GroupId,
    name: String,
    description: String,
    subject: String,
    semester: String,
    members_count: u64,
    tasks_count: u64,
    tasks_completed_count: u64,
    recent_activity: String,
}

impl From<GroupSummary> for GroupListEntry {
    fn from(summary: GroupSummary) -> Self {
        let profile = summary.group.profile();
        Self {
            id: summary.group.id(),
            name: profile.name().to_owned(),
            description: profile.description().to_owned(),
            subject: profile.subject().to_owned(),
            semester: profile.semester().to_owned(),
            members_count: summary.members_count,
            tasks_count: summary.tasks_count,
            tasks_completed_count: summary.tasks_completed_count,
            recent_activity: summary.recent_activity,
        }
    }
}

#[derive(Debug, Serialize)]
struct GroupDetailResponse {
    id: GroupId,
    name: String,
    description: String,
    subject: String,
    semester: String,
    members: Vec<GroupMember>,
    tasks: Vec<TaskResponse>,
    invite_code: InviteCode,
}

impl From<GroupDetail> for GroupDetailResponse {
    fn from(detail: GroupDetail) -> Self {
        let profile = detail.group.profile();
        Self {
            id: detail.group.id(),
            name: profile.name().to_owned(),
            description: profile.description().to_owned(),
            subject: profile.subject().to_owned(),
            semester: profile.semester().to_owned(),
            tasks: detail.tasks.iter().map(TaskResponse::from).collect(),
            invite_code: detail.group.invite_code().clone(),
            members: detail.members,
        }
    }
}

#[derive(Debug, Serialize)]
struct JoinResponse {
    success: &'static str,
}

async fn list<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
) -> Result<Json<Vec<GroupListEntry>>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let summaries = state.groups.list_for_user(caller.user.id()).await?;
    Ok(Json(
        summaries.into_iter().map(GroupListEntry::from).collect(),
    ))
}

async fn create<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    JsonBody(body): JsonBody<GroupBody>,
) -> Result<(StatusCode, Json<GroupCreatedResponse>), ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let group = state.groups.create(caller.user.id(), body.into()).await?;
    Ok((StatusCode::CREATED, Json(group.into())))
}

async fn retrieve<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    IdPath(id): IdPath,
) -> Result<Json<GroupDetailResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let detail = state
        .groups
        .detail(caller.user.id(), GroupId::from_uuid(id))
        .await?;
    Ok(Json(detail.into()))
}

async fn replace<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<GroupBody>,
) -> Result<Json<GroupDetailResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let changes = GroupChanges::from(GroupFields::from(body));
    let detail = state
        .groups
        .update(caller.user.id(), GroupId::from_uuid(id), changes)
        .await?;
    Ok(Json(detail.into()))
}

async fn patch<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<PatchGroupBody>,
) -> Result<Json<GroupDetailResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let detail = state
        .groups
        .update(caller.user.id(), GroupId::from_uuid(id), body.into())
        .await?;
    Ok(Json(detail.into()))
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
        .groups
        .delete(caller.user.id(), GroupId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn dashboard_stats<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
) -> Result<Json<DashboardStats>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    Ok(Json(state.dashboard.stats_for(caller.user.id()).await?))
}

async fn join<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    JsonBody(body): JsonBody<JoinBody>,
) -> Result<Json<JoinResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let code = body.invite_code.unwrap_or_default();
    state.groups.join(caller.user.id(), &code).await?;
    Ok(Json(JoinResponse {
        success: "Successfully joined the group",
    }))
}
