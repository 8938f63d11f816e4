//! PII detection, clustering, abstraction and anonymization routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use tracing::error;

use crate::state::AppState;

pub const ABSTRACT_FALLBACK: &str = "Unable to abstract the content";

// ---------------------------------------------------------------
// Route builder
// ---------------------------------------------------------------

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/detect", post(detect))
        .route("/cluster", post(cluster))
        .route("/abstract", post(abstract_text))
        .route("/anonymize", post(anonymize))
}

// ---------------------------------------------------------------
// Request types
// ---------------------------------------------------------------

#[derive(serde::Deserialize)]
struct MessageInput {
    message: String,
}

#[derive(serde::Deserialize)]
struct ClusterInput {
    message: String,
    #[serde(default)]
    pii: Option<Vec<String>>,
}

#[derive(serde::Deserialize)]
struct AbstractInput {
    message: String,
    #[serde(default)]
    protected: Option<Vec<String>>,
}

#[derive(serde::Deserialize)]
struct AnonymizeInput {
    text: String,
    #[serde(default = "default_language")]
    language: String,
    #[serde(default = "default_use_fake", rename = "useFake")]
    use_fake: bool,
}

fn default_language() -> String {
    "en".into()
}
fn default_use_fake() -> bool {
    true
}

fn inference_error(e: cloak_core::Error) -> (StatusCode, Json<serde_json::Value>) {
    error!("Inference call failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": "Error running Ollama",
            "details": e.to_string(),
        })),
    )
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

/// POST /detect: detections merged across segments. A bad segment is skipped.
async fn detect(
    State(state): State<Arc<AppState>>,
    Json(input): Json<MessageInput>,
) -> Json<serde_json::Value> {
    let outcome = state.pipeline.detect(&input.message).await;
    Json(serde_json::json!({ "results": outcome.results }))
}

/// POST /cluster: raw model content, plus the decoded mapping when it decodes.
async fn cluster(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ClusterInput>,
) -> impl IntoResponse {
    match state
        .pipeline
        .cluster(&input.message, input.pii.as_deref())
        .await
    {
        Ok(reply) => {
            let mut body = serde_json::json!({ "results": reply.raw });
            if let Some(mapping) = reply.mapping {
                body["clusters"] = serde_json::json!(mapping);
            }
            (StatusCode::OK, Json(body))
        }
        Err(e) => inference_error(e),
    }
}

/// POST /abstract: rewritten text, or the fallback when the reply has no `results`.
async fn abstract_text(
    State(state): State<Arc<AppState>>,
    Json(input): Json<AbstractInput>,
) -> impl IntoResponse {
    match state
        .pipeline
        .abstract_text(&input.message, input.protected.as_deref())
        .await
    {
        Ok(Some(rewritten)) => (
            StatusCode::OK,
            Json(serde_json::json!({ "results": rewritten })),
        ),
        Ok(None) => (
            StatusCode::OK,
            Json(serde_json::json!({ "results": ABSTRACT_FALLBACK })),
        ),
        Err(e) => inference_error(e),
    }
}

/// POST /anonymize: analyzer then anonymizer.
async fn anonymize(
    State(state): State<Arc<AppState>>,
    Json(input): Json<AnonymizeInput>,
) -> impl IntoResponse {
    match state
        .presidio
        .anonymize_text(&input.text, &input.language, input.use_fake)
        .await
    {
        Ok(anonymized) => (
            StatusCode::OK,
            Json(serde_json::to_value(anonymized).unwrap_or_default()),
        ),
        Err(e) => {
            error!("Anonymization failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "error": "Error running anonymizer",
                    "details": e.to_string(),
                })),
            )
        }
    }
}
