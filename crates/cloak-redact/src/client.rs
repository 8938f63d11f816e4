//! Image redaction service client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use cloak_core::{Error, Result};

use crate::rasterize::PageImage;

/// Trait for services that black out PII in a page image.
#[async_trait]
pub trait ImageRedactor: Send + Sync {
    /// Return the redacted image bytes for `page`.
    async fn redact(&self, page: &PageImage) -> Result<Vec<u8>>;
}

/// Client for `POST {base_url}/redact` (multipart `image` + `analyze_image`).
pub struct HttpImageRedactor {
    client: Client,
    url: String,
}

impl HttpImageRedactor {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!("{}/redact", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl ImageRedactor for HttpImageRedactor {
    async fn redact(&self, page: &PageImage) -> Result<Vec<u8>> {
        let image = Part::bytes(page.png.clone())
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(|e| Error::RedactionService(format!("bad mime type: {}", e)))?;
        let form = Form::new()
            .part("image", image)
            .text("analyze_image", "true");

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::RedactionService(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RedactionService(format!("{}: {}", status, body)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::RedactionService(format!("Reading body failed: {}", e)))?;
        debug!("Page {} redacted ({} bytes)", page.number, bytes.len());
        Ok(bytes.to_vec())
    }
}
