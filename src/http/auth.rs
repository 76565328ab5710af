//! Account and token routes under `/auth`.

use super::{ApiError, AppState, Authenticated, JsonBody};
use crate::app::Backend;
use crate::identity::domain::{EmailAddress, User, UserId, Username};
use crate::identity::services::{LoginRequest, RegisterRequest};
use axum::body::Bytes;
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
        .route("/auth/register", post(register::<B, C>))
        .route("/auth/login", post(login::<B, C>))
        .route("/auth/refresh", post(refresh::<B, C>))
        .route("/auth/logout", post(logout::<B, C>))
        .route("/auth/me", get(me::<B, C>).delete(delete_me::<B, C>))
}

#[derive(Deserialize)]
struct RegisterBody {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    confirm_password: String,
}

#[derive(Deserialize)]
struct LoginBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
struct RefreshBody {
    refresh: String,
}

#[derive(Default, Deserialize)]
struct LogoutBody {
    #[serde(default)]
    refresh: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct DetailResponse {
    detail: &'static str,
}

#[derive(Debug, Serialize)]
struct UserSummary {
    username: Username,
    email: EmailAddress,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    access: String,
    refresh: String,
    user: UserSummary,
}

#[derive(Debug, Serialize)]
struct AccessResponse {
    access: String,
}

#[derive(Debug, Serialize)]
struct ProfileResponse {
    id: UserId,
    username: Username,
    email: EmailAddress,
    first_name: String,
    last_name: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id(),
            username: user.username().clone(),
            email: user.email().clone(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
        }
    }
}

async fn register<B, C>(
    State(state): State<AppState<B, C>>,
    JsonBody(body): JsonBody<RegisterBody>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let request = RegisterRequest::new(
        body.username,
        body.email,
        body.password,
        body.confirm_password,
    );
    state.accounts.register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully",
        }),
    ))
}

async fn login<B, C>(
    State(state): State<AppState<B, C>>,
    JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let session = state
        .accounts
        .login(LoginRequest::new(body.email, body.password))
        .await?;
    Ok(Json(LoginResponse {
        access: session.tokens.access.token,
        refresh: session.tokens.refresh.token,
        user: UserSummary {
            username: session.user.username().clone(),
            email: session.user.email().clone(),
        },
    }))
}

async fn refresh<B, C>(
    State(state): State<AppState<B, C>>,
    JsonBody(body): JsonBody<RefreshBody>,
) -> Result<Json<AccessResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let access = state.accounts.refresh(&body.refresh).await?;
    Ok(Json(AccessResponse {
        access: access.token,
    }))
}

async fn logout<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
    body: Bytes,
) -> Result<Json<DetailResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let parsed: LogoutBody = if body.is_empty() {
        LogoutBody::default()
    } else {
        serde_json::from_slice(&body).map_err(|err| ApiError::Validation(err.to_string()))?
    };
    state
        .accounts
        .logout(&caller.token, parsed.refresh.as_deref())
        .await?;
    Ok(Json(DetailResponse {
        detail: "Logged out successfully.",
    }))
}

async fn me<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
) -> Result<Json<ProfileResponse>, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    let user = state.accounts.profile(caller.user.id()).await?;
    Ok(Json(user.into()))
}

async fn delete_me<B, C>(
    State(state): State<AppState<B, C>>,
    caller: Authenticated,
) -> Result<StatusCode, ApiError>
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    state.accounts.delete_account(caller.user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
