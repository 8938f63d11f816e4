//! Health check and client key routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/openaiapikey", get(openai_api_key))
}

/// GET /: liveness.
async fn home() -> &'static str {
    "HI"
}

/// GET /openaiapikey: hand the configured key to the browser client.
async fn openai_api_key(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.config.openai_api_key {
        Some(key) => (StatusCode::OK, Json(serde_json::json!({ "apiKey": key }))),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "API key not found" })),
        ),
    }
}
