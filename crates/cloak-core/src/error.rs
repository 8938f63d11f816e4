//! Error types for Cloak.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Inference service unavailable: {0}")]
    InferenceUnavailable(String),

    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    #[error("Redaction service error: {0}")]
    RedactionService(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Analyzer service unavailable: {0}")]
    AnalyzerUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
