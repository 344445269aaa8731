/*
 * Responsibility
 * - URL layout: / (forward-auth) and /_health
 */
use axum::{Router, routing::get};

use crate::api::handlers::{forward_auth::forward_auth, health::health};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(forward_auth))
        .route("/_health", get(health))
}
