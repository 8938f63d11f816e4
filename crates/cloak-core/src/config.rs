//! Service configuration: downstream URLs, segmentation and taxonomy.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::taxonomy::EntityType;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_INFERENCE_URL: &str = "http://localhost:11434";
pub const DEFAULT_ANONYMIZE_URL: &str = "http://localhost:5001";
pub const DEFAULT_ANALYZE_URL: &str = "http://localhost:5002";
pub const DEFAULT_REDACT_URL: &str = "http://localhost:5003";
pub const DEFAULT_MAX_SEGMENT_LENGTH: usize = 500;

/// Model names used per task on the inference server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelNames {
    #[serde(default = "default_detect_model")]
    pub detect: String,
    #[serde(default = "default_cluster_model")]
    pub cluster: String,
    #[serde(default = "default_abstract_model")]
    pub abstract_text: String,
}

fn default_detect_model() -> String {
    "llama3".into()
}
fn default_cluster_model() -> String {
    "clusterModel".into()
}
fn default_abstract_model() -> String {
    "abstractModel".into()
}

impl Default for ModelNames {
    fn default() -> Self {
        Self {
            detect: default_detect_model(),
            cluster: default_cluster_model(),
            abstract_text: default_abstract_model(),
        }
    }
}

/// Top-level Cloak configuration, fixed at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloakConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_inference_url")]
    pub inference_url: String,
    #[serde(default = "default_analyze_url")]
    pub analyze_url: String,
    #[serde(default = "default_anonymize_url")]
    pub anonymize_url: String,
    #[serde(default = "default_redact_url")]
    pub redact_url: String,
    #[serde(default = "default_max_segment_length")]
    pub max_segment_length: usize,
    #[serde(default = "default_taxonomy")]
    pub taxonomy: Vec<EntityType>,
    #[serde(default)]
    pub models: ModelNames,
    /// Per-request timeout for downstream calls. `None` waits indefinitely.
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
    /// Never read from the config file.
    #[serde(skip)]
    pub openai_api_key: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_inference_url() -> String {
    DEFAULT_INFERENCE_URL.into()
}
fn default_analyze_url() -> String {
    DEFAULT_ANALYZE_URL.into()
}
fn default_anonymize_url() -> String {
    DEFAULT_ANONYMIZE_URL.into()
}
fn default_redact_url() -> String {
    DEFAULT_REDACT_URL.into()
}
fn default_max_segment_length() -> usize {
    DEFAULT_MAX_SEGMENT_LENGTH
}
fn default_taxonomy() -> Vec<EntityType> {
    EntityType::ALL.to_vec()
}

impl Default for CloakConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            inference_url: default_inference_url(),
            analyze_url: default_analyze_url(),
            anonymize_url: default_anonymize_url(),
            redact_url: default_redact_url(),
            max_segment_length: DEFAULT_MAX_SEGMENT_LENGTH,
            taxonomy: default_taxonomy(),
            models: ModelNames::default(),
            http_timeout_secs: None,
            openai_api_key: None,
        }
    }
}

impl CloakConfig {
    /// Load configuration from `CLOAK_CONFIG` (if set) and the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `env` to resolve variables.
    ///
    /// Precedence: defaults, then the JSON file named by `CLOAK_CONFIG`,
    /// then individual environment overrides.
    pub fn load_with<F>(env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match env("CLOAK_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(v) = env("CLOAK_INFERENCE_URL") {
            config.inference_url = v;
        }
        if let Some(v) = env("CLOAK_ANALYZE_URL") {
            config.analyze_url = v;
        }
        if let Some(v) = env("CLOAK_ANONYMIZE_URL") {
            config.anonymize_url = v;
        }
        if let Some(v) = env("CLOAK_REDACT_URL") {
            config.redact_url = v;
        }
        if let Some(v) = env("CLOAK_MAX_SEGMENT_LENGTH") {
            config.max_segment_length = parse_var("CLOAK_MAX_SEGMENT_LENGTH", &v)?;
        }
        if let Some(v) = env("CLOAK_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = Some(parse_var("CLOAK_HTTP_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = env("PORT") {
            config.port = parse_var("PORT", &v)?;
        }
        config.openai_api_key = env("OPENAI_API_KEY").filter(|k| !k.is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: CloakConfig = serde_json::from_str(&data)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_segment_length == 0 {
            return Err(Error::Config("max_segment_length must be positive".into()));
        }
        if self.taxonomy.is_empty() {
            return Err(Error::Config("taxonomy must not be empty".into()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid value for {}: {:?}", name, value)))
}
