use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::publish;
use crate::state::AppState;

/// Per-request body cap for photo uploads (25 MiB).
const MAX_PUBLISH_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Mount the publish route.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/publish",
        post(publish::publish_listing).layer(DefaultBodyLimit::max(MAX_PUBLISH_BODY_BYTES)),
    )
}
