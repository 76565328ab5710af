//! JSON HTTP API over the application services.
//!
//! Every route except registration, login, and refresh requires an
//! `Authorization: Bearer <access token>` header. Handlers are thin: they
//! translate request bodies into service calls and service results into
//! response bodies, and [`ApiError`] turns failures into
//! `{"error": "<message>"}` with the matching status code.

mod auth;
mod error;
mod extract;
mod groups;
mod messages;
mod tasks;

pub use error::{ApiError, INTERNAL_ERROR_MESSAGE};
pub use extract::{Authenticated, IdPath, JsonBody, QueryParams};

use crate::app::{Backend, ServiceRegistry};
use axum::Router;
use mockable::Clock;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared handler state.
pub type AppState<B, C> = Arc<ServiceRegistry<B, C>>;

/// Builds the API router over the given services.
#[must_use]
pub fn router<B, C>(services: AppState<B, C>) -> Router
where
    B: Backend,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .merge(auth::routes())
        .merge(groups::routes())
        .merge(tasks::routes())
        .merge(messages::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(services)
}
