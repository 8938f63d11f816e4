//! Inference client for the local language-model server.
//!
//! Every task (detect, cluster, abstract) is a single non-streaming chat call
//! asking for a JSON reply. The `InferenceBackend` trait is the seam between
//! the dispatcher and the HTTP client so the pipelines can be driven by doubles.

pub mod dispatch;
pub mod ollama;
pub mod prompts;
pub mod types;

pub use dispatch::{InferenceBackend, ModelDispatcher};
pub use ollama::OllamaClient;
pub use types::*;
