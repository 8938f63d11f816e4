//! Task dispatch: instruction + input → one inference call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use cloak_core::{EntityType, ModelNames, Result};

use crate::prompts;
use crate::types::Task;

/// Trait for text-generation backends.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Send `content` as a single user turn to `model` and return the reply content.
    async fn chat(&self, model: &str, content: &str) -> Result<String>;
}

/// Builds the task instruction and invokes the backend.
#[derive(Clone)]
pub struct ModelDispatcher {
    backend: Arc<dyn InferenceBackend>,
    models: ModelNames,
    taxonomy: Vec<EntityType>,
}

impl ModelDispatcher {
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        models: ModelNames,
        taxonomy: Vec<EntityType>,
    ) -> Self {
        Self {
            backend,
            models,
            taxonomy,
        }
    }

    pub fn model_for(&self, task: Task) -> &str {
        match task {
            Task::Detect => &self.models.detect,
            Task::Cluster => &self.models.cluster,
            Task::Abstract => &self.models.abstract_text,
        }
    }

    /// Full content sent for `task` over `input`.
    pub fn content_for(&self, task: Task, input: &str) -> String {
        format!("{}\n\n{}", prompts::instruction(task, &self.taxonomy), input)
    }

    /// Run `task` over `input`, returning the raw reply content.
    pub async fn dispatch(&self, task: Task, input: &str) -> Result<String> {
        let model = self.model_for(task);
        debug!("Dispatching {} ({} chars) to {}", task, input.chars().count(), model);
        self.backend
            .chat(model, &self.content_for(task, input))
            .await
    }
}
