//! JSON error responses for the HTTP API.
//!
//! Every service error is folded into an [`ApiError`] here, so handlers can
//! use `?` and clients always receive `{"error": "<message>"}`.

use crate::dashboard::DashboardError;
use crate::group::services::{AccessError, GroupServiceError};
use crate::identity::services::AccountServiceError;
use crate::message::ports::MessageRepositoryError;
use crate::message::services::MessageServiceError;
use crate::task::ports::TaskRepositoryError;
use crate::task::services::TaskServiceError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Body returned for storage and other unexpected failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Errors returned by HTTP handlers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request is malformed or breaks a validation rule.
    #[error("{0}")]
    Validation(String),

    /// Authentication is missing or failed.
    #[error("{0}")]
    Unauthorized(String),

    /// The caller is authenticated but may not act on the resource.
    #[error("{0}")]
    Forbidden(String),

    /// The resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure. The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message shown to the client.
    #[must_use]
    pub fn public_message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message) => message,
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }

    fn validation(err: &impl ToString) -> Self {
        Self::Validation(err.to_string())
    }

    fn internal(err: &impl ToString) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let Self::Internal(detail) = &self {
            error!(error = %detail, "request failed");
        }
        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::GroupNotFound(_) => Self::NotFound("Group not found".to_owned()),
            AccessError::NotMember { .. } => {
                Self::Forbidden("You are not a member of this group".to_owned())
            }
            AccessError::NotAdmin { .. } => {
                Self::Forbidden("Only group admins can perform this action".to_owned())
            }
            AccessError::Repository(inner) => Self::internal(&inner),
        }
    }
}

impl From<AccountServiceError> for ApiError {
    fn from(err: AccountServiceError) -> Self {
        match err {
            AccountServiceError::Domain(_)
            | AccountServiceError::PasswordMismatch
            | AccountServiceError::UsernameTaken
            | AccountServiceError::EmailTaken => Self::validation(&err),
            AccountServiceError::UserNotFound => Self::NotFound(err.to_string()),
            AccountServiceError::InvalidCredentials | AccountServiceError::InvalidToken => {
                Self::Unauthorized(err.to_string())
            }
            AccountServiceError::Repository(_) | AccountServiceError::Credential(_) => {
                Self::internal(&err)
            }
        }
    }
}

impl From<GroupServiceError> for ApiError {
    fn from(err: GroupServiceError) -> Self {
        match err {
            GroupServiceError::Access(inner) => inner.into(),
            GroupServiceError::Domain(_)
            | GroupServiceError::MissingInviteCode
            | GroupServiceError::AlreadyMember(_) => Self::validation(&err),
            GroupServiceError::UnknownInviteCode => Self::NotFound(err.to_string()),
            GroupServiceError::Repository(_)
            | GroupServiceError::Tasks(_)
            | GroupServiceError::InviteCodesExhausted { .. } => Self::internal(&err),
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::Access(inner) => inner.into(),
            TaskServiceError::Domain(_) | TaskServiceError::AssigneeNotMember(_) => {
                Self::validation(&err)
            }
            TaskServiceError::NotFound(_)
            | TaskServiceError::Repository(TaskRepositoryError::NotFound(_)) => {
                Self::NotFound("Task not found".to_owned())
            }
            TaskServiceError::Repository(_) | TaskServiceError::Groups(_) => Self::internal(&err),
        }
    }
}

impl From<MessageServiceError> for ApiError {
    fn from(err: MessageServiceError) -> Self {
        match err {
            MessageServiceError::Access(inner) => inner.into(),
            MessageServiceError::Domain(_) => Self::validation(&err),
            MessageServiceError::NotFound(_)
            | MessageServiceError::Repository(MessageRepositoryError::NotFound(_)) => {
                Self::NotFound("Message not found".to_owned())
            }
            MessageServiceError::Repository(_) | MessageServiceError::Groups(_) => {
                Self::internal(&err)
            }
        }
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self::internal(&err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::NotFound("Not found".to_owned())
    }
}
