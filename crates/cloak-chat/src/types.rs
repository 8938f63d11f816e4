//! Wire types for the Ollama chat API.

use serde::{Deserialize, Serialize};

/// The three model-backed tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Detect,
    Cluster,
    Abstract,
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Task::Detect => write!(f, "detect"),
            Task::Cluster => write!(f, "cluster"),
            Task::Abstract => write!(f, "abstract"),
        }
    }
}

/// Chat message in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatOptions {
    pub temperature: f64,
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub format: &'static str,
    pub options: ChatOptions,
    pub stream: bool,
}

impl ChatRequest {
    /// Single user turn, JSON-constrained, deterministic.
    pub fn json_reply(model: &str, content: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::user(content)],
            format: "json",
            options: ChatOptions { temperature: 0.0 },
            stream: false,
        }
    }
}

/// Non-streaming reply. Only the message content is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub message: Option<ChatMessage>,
}
