//! HTTP surface the identity provider calls.

pub mod health;
pub mod hook;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(hook::router(state))
        .layer(TraceLayer::new_for_http())
}
