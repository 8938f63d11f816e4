//! Ollama chat client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use cloak_core::{Error, Result};

use crate::dispatch::InferenceBackend;
use crate::types::{ChatRequest, ChatResponse};

/// Client for `POST {base_url}/api/chat`.
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn chat(&self, model: &str, content: &str) -> Result<String> {
        let url = self.chat_url();
        debug!("Chat request to {} with model {}", url, model);

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest::json_reply(model, content))
            .send()
            .await
            .map_err(|e| Error::InferenceUnavailable(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InferenceUnavailable(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::InferenceUnavailable(format!("Invalid reply body: {}", e)))?;

        parsed
            .message
            .map(|m| m.content)
            .ok_or_else(|| Error::InferenceUnavailable("Reply has no message content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_chat_returns_message_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_body(Matcher::PartialJson(json!({
                "model": "llama3",
                "format": "json",
                "stream": false,
                "options": {"temperature": 0.0},
                "messages": [{"role": "user", "content": "hello"}],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"model": "llama3", "message": {"role": "assistant", "content": "{\"results\": []}"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = OllamaClient::new(Client::new(), format!("{}/", server.url()));
        let content = client.chat("llama3", "hello").await.unwrap();
        assert_eq!(content, "{\"results\": []}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(503)
            .with_body("model loading")
            .create_async()
            .await;

        let client = OllamaClient::new(Client::new(), server.url());
        let err = client.chat("llama3", "hello").await.unwrap_err();
        match err {
            Error::InferenceUnavailable(msg) => assert!(msg.contains("503")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_message_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body(json!({"error": "model not found"}).to_string())
            .create_async()
            .await;

        let client = OllamaClient::new(Client::new(), server.url());
        let err = client.chat("llama3", "hello").await.unwrap_err();
        assert!(matches!(err, Error::InferenceUnavailable(_)));
    }
}
