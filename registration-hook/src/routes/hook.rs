use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::Value;

use crate::handler::InvocationContext;
use crate::AppState;

/// POST /hooks/post-confirmation - register the confirmed user, echo the event
///
/// Always answers 200 with the exact bytes the identity provider sent.
async fn post_confirmation(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let event: Value = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!("Post-confirmation body is not valid JSON: {}", e);
            return echo(body);
        }
    };

    let handler = state.handler.clone();
    let ctx = InvocationContext::traced();
    let invocation_id = ctx.invocation_id().to_string();

    // The store call blocks, so keep it off the async workers.
    if let Err(e) = tokio::task::spawn_blocking(move || handler.handle_request(event, &ctx)).await {
        tracing::error!(invocation_id = %invocation_id, "Registration task failed: {}", e);
    }

    echo(body)
}

fn echo(body: Bytes) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/hooks/post-confirmation", post(post_confirmation))
        .with_state(state)
}
