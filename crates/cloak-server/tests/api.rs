//! API tests: drive the router in-process against mock downstream services.
//!
//! Each test starts a mockito server standing in for the inference server
//! (and the analyzer/anonymizer where needed) and sends requests through
//! `tower::ServiceExt::oneshot`, so no socket is bound for Cloak itself.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use tower::ServiceExt;

use cloak_core::CloakConfig;
use cloak_server::{build_router, AppState};

fn app(config: CloakConfig) -> Router {
    build_router(Arc::new(AppState::new(config, reqwest::Client::new())))
}

fn config_for(server: &ServerGuard, max_segment_length: usize) -> CloakConfig {
    CloakConfig {
        inference_url: server.url(),
        analyze_url: server.url(),
        anonymize_url: server.url(),
        max_segment_length,
        ..CloakConfig::default()
    }
}

/// Ollama reply whose message content is `content`.
fn ollama_reply(content: &str) -> String {
    json!({
        "model": "llama3",
        "message": {"role": "assistant", "content": content},
        "done": true,
    })
    .to_string()
}

async fn mock_chat(server: &mut ServerGuard, body_marker: &str, content: &str) -> Mock {
    server
        .mock("POST", "/api/chat")
        .match_body(Matcher::Regex(regex::escape(body_marker)))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ollama_reply(content))
        .create_async()
        .await
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

// ---------------------------------------------------------------
// /detect
// ---------------------------------------------------------------

#[tokio::test]
async fn test_detect_skips_malformed_segment() {
    let mut server = mockito::Server::new_async().await;
    let first = mock_chat(
        &mut server,
        "aaaaa",
        r#"{"results": [{"entity_type": "NAME", "text": "Alice"}]}"#,
    )
    .await;
    let second = mock_chat(&mut server, "bbbbb", "Here you go: {results: [").await;
    let third = mock_chat(
        &mut server,
        "ccccc",
        r#"{"results": [{"entity_type": "EMAIL", "text": "alice@example.com"}]}"#,
    )
    .await;

    let (status, body) = post_json(
        app(config_for(&server, 5)),
        "/detect",
        json!({"message": "aaaaabbbbbccccc"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"results": [
            {"entity_type": "NAME", "text": "Alice"},
            {"entity_type": "EMAIL", "text": "alice@example.com"},
        ]})
    );
    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn test_detect_dedups_across_segments() {
    let mut server = mockito::Server::new_async().await;
    let _first = mock_chat(
        &mut server,
        "aaaaa",
        r#"{"results": [{"entity_type": "NAME", "text": "Jordan"}, {"entity_type": "SSN", "text": "1"}]}"#,
    )
    .await;
    let _second = mock_chat(
        &mut server,
        "bbbbb",
        r#"{"results": [{"entity_type": "GEOLOCATION", "text": "Jordan"}]}"#,
    )
    .await;

    let (status, body) = post_json(
        app(config_for(&server, 5)),
        "/detect",
        json!({"message": "aaaaabbbbb"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"results": [
            {"entity_type": "GEOLOCATION", "text": "Jordan"},
            {"entity_type": "SSN", "text": "1"},
        ]})
    );
}

#[tokio::test]
async fn test_detect_survives_inference_outage() {
    let mut server = mockito::Server::new_async().await;
    let _down = server
        .mock("POST", "/api/chat")
        .with_status(500)
        .create_async()
        .await;

    let (status, body) = post_json(
        app(config_for(&server, 500)),
        "/detect",
        json!({"message": "My name is Alice"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"results": []}));
}

#[tokio::test]
async fn test_detect_empty_message() {
    let mut server = mockito::Server::new_async().await;
    let never = server
        .mock("POST", "/api/chat")
        .expect(0)
        .create_async()
        .await;

    let (status, body) =
        post_json(app(config_for(&server, 500)), "/detect", json!({"message": ""})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"results": []}));
    never.assert_async().await;
}

// ---------------------------------------------------------------
// /cluster
// ---------------------------------------------------------------

#[tokio::test]
async fn test_cluster_returns_raw_and_mapping() {
    let mut server = mockito::Server::new_async().await;
    let content = r#"{"Bill Gates": ["Bill Gates", "Microsoft"], "jeremy@x.io": ["jeremy@x.io"]}"#;
    let _mock = mock_chat(&mut server, "<pii2>jeremy@x.io</pii2>", content).await;

    let (status, body) = post_json(
        app(config_for(&server, 500)),
        "/cluster",
        json!({
            "message": "Bill Gates founded Microsoft. Mail jeremy@x.io",
            "pii": ["Bill Gates", "jeremy@x.io"],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!(content));
    assert_eq!(body["clusters"]["Bill Gates"], json!(["Bill Gates", "Microsoft"]));
}

#[tokio::test]
async fn test_cluster_non_json_content_passes_through() {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_chat(&mut server, "tagged message", "{'VU': ['VU']}").await;

    let (status, body) = post_json(
        app(config_for(&server, 500)),
        "/cluster",
        json!({"message": "tagged message"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"results": "{'VU': ['VU']}"}));
}

#[tokio::test]
async fn test_cluster_inference_failure_is_500() {
    let mut server = mockito::Server::new_async().await;
    let _down = server
        .mock("POST", "/api/chat")
        .with_status(503)
        .create_async()
        .await;

    let (status, body) = post_json(
        app(config_for(&server, 500)),
        "/cluster",
        json!({"message": "anything"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error running Ollama");
    assert!(body["details"].as_str().unwrap().contains("503"));
}

// ---------------------------------------------------------------
// /abstract
// ---------------------------------------------------------------

#[tokio::test]
async fn test_abstract_rewrites() {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_chat(
        &mut server,
        "<ProtectedInformation>Acme Corp, Tuesday</ProtectedInformation>",
        r#"{"results": "I work at a company. Recently I had a conflict."}"#,
    )
    .await;

    let (status, body) = post_json(
        app(config_for(&server, 500)),
        "/abstract",
        json!({
            "message": "I work at Acme Corp. On Tuesday I had a conflict.",
            "protected": ["Acme Corp", "Tuesday"],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"results": "I work at a company. Recently I had a conflict."})
    );
}

#[tokio::test]
async fn test_abstract_without_results_falls_back() {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_chat(&mut server, "some text", r#"{"rewrite": "elsewhere"}"#).await;

    let (status, body) = post_json(
        app(config_for(&server, 500)),
        "/abstract",
        json!({"message": "some text"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"results": "Unable to abstract the content"}));
}

#[tokio::test]
async fn test_abstract_non_json_content_is_500() {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_chat(&mut server, "some text", "I cannot help with that").await;

    let (status, body) = post_json(
        app(config_for(&server, 500)),
        "/abstract",
        json!({"message": "some text"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error running Ollama");
}

// ---------------------------------------------------------------
// /anonymize
// ---------------------------------------------------------------

#[tokio::test]
async fn test_anonymize_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let _analyze = server
        .mock("POST", "/analyze")
        .with_status(200)
        .with_body(json!([{"entity_type": "PERSON", "start": 0, "end": 5, "score": 0.85}]).to_string())
        .create_async()
        .await;
    let anonymize = server
        .mock("POST", "/anonymize")
        .match_body(Matcher::Regex(r#""PERSON":\{[^}]*"new_value":"[^"]+""#.into()))
        .with_status(200)
        .with_body(json!({"text": "Maria says hi", "items": []}).to_string())
        .create_async()
        .await;

    let (status, body) = post_json(
        app(config_for(&server, 500)),
        "/anonymize",
        json!({"text": "Alice says hi"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Maria says hi");
    anonymize.assert_async().await;
}

#[tokio::test]
async fn test_anonymize_analyzer_down_is_502() {
    let mut server = mockito::Server::new_async().await;
    let _analyze = server
        .mock("POST", "/analyze")
        .with_status(500)
        .create_async()
        .await;

    let (status, body) = post_json(
        app(config_for(&server, 500)),
        "/anonymize",
        json!({"text": "Alice says hi", "useFake": false}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Error running anonymizer");
}

// ---------------------------------------------------------------
// System routes
// ---------------------------------------------------------------

#[tokio::test]
async fn test_home() {
    let (status, body) = get(app(CloakConfig::default()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"HI");
}

#[tokio::test]
async fn test_openai_api_key() {
    let config = CloakConfig {
        openai_api_key: Some("sk-test-123".into()),
        ..CloakConfig::default()
    };
    let (status, body) = get(app(config), "/openaiapikey").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"apiKey": "sk-test-123"}));
}

#[tokio::test]
async fn test_openai_api_key_missing() {
    let (status, body) = get(app(CloakConfig::default()), "/openaiapikey").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"error": "API key not found"}));
}
