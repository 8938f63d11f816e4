//! Shared application state.

use std::sync::Arc;

use cloak_chat::{ModelDispatcher, OllamaClient};
use cloak_core::CloakConfig;
use cloak_detect::{PiiPipeline, PresidioClient};

/// Shared application state accessible from all route handlers.
///
/// Built once at startup; handlers only read it.
pub struct AppState {
    pub config: CloakConfig,
    pub pipeline: PiiPipeline,
    pub presidio: PresidioClient,
}

impl AppState {
    pub fn new(config: CloakConfig, http: reqwest::Client) -> Self {
        let backend = Arc::new(OllamaClient::new(http.clone(), config.inference_url.clone()));
        let dispatcher =
            ModelDispatcher::new(backend, config.models.clone(), config.taxonomy.clone());
        let pipeline = PiiPipeline::new(dispatcher, config.max_segment_length);
        let presidio = PresidioClient::new(http, &config.analyze_url, &config.anonymize_url);

        Self {
            config,
            pipeline,
            presidio,
        }
    }
}
