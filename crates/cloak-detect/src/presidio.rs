//! Rule-based path: analyzer service → anonymizer service.
//!
//! The analyzer returns recognizer hits; the anonymizer rewrites the text from
//! them. With fake substitution on, person names, emails and phone numbers
//! are replaced by synthetic values instead of the anonymizer's placeholders.

use std::collections::BTreeMap;

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::FirstName;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use cloak_core::{Error, Result};

/// One analyzer hit. Unknown fields are carried through to the anonymizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizerResult {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    pub score: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Operator config for one entity type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operator {
    #[serde(rename = "type")]
    pub kind: String,
    pub new_value: String,
}

impl Operator {
    pub fn replace(new_value: impl Into<String>) -> Self {
        Self {
            kind: "replace".into(),
            new_value: new_value.into(),
        }
    }
}

/// Anonymizer reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizedText {
    pub text: String,
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Build replace operators with synthetic values for the hit types that have one.
pub fn fake_operators(results: &[RecognizerResult]) -> BTreeMap<String, Operator> {
    let mut operators = BTreeMap::new();
    for result in results {
        let new_value: String = match result.entity_type.as_str() {
            "PERSON" => FirstName().fake(),
            "EMAIL_ADDRESS" => SafeEmail().fake(),
            "PHONE_NUMBER" => PhoneNumber().fake(),
            _ => continue,
        };
        operators.insert(result.entity_type.clone(), Operator::replace(new_value));
    }
    operators
}

/// HTTP client for the analyzer and anonymizer services.
pub struct PresidioClient {
    client: Client,
    analyze_url: String,
    anonymize_url: String,
}

impl PresidioClient {
    pub fn new(client: Client, analyze_base: &str, anonymize_base: &str) -> Self {
        Self {
            client,
            analyze_url: format!("{}/analyze", analyze_base.trim_end_matches('/')),
            anonymize_url: format!("{}/anonymize", anonymize_base.trim_end_matches('/')),
        }
    }

    async fn post<T: for<'de> Deserialize<'de>>(&self, url: &str, body: &Value) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::AnalyzerUnavailable(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::AnalyzerUnavailable(format!(
                "{} returned {}: {}",
                url, status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::AnalyzerUnavailable(format!("Invalid reply from {}: {}", url, e)))
    }

    pub async fn analyze(&self, text: &str, language: &str) -> Result<Vec<RecognizerResult>> {
        let results: Vec<RecognizerResult> = self
            .post(&self.analyze_url, &json!({ "text": text, "language": language }))
            .await?;
        debug!("Analyzer found {} entities", results.len());
        Ok(results)
    }

    pub async fn anonymize(
        &self,
        text: &str,
        results: &[RecognizerResult],
        operators: &BTreeMap<String, Operator>,
    ) -> Result<AnonymizedText> {
        self.post(
            &self.anonymize_url,
            &json!({
                "text": text,
                "analyzer_results": results,
                "anonymizers": operators,
            }),
        )
        .await
    }

    /// Analyze then anonymize `text`.
    pub async fn anonymize_text(
        &self,
        text: &str,
        language: &str,
        use_fake: bool,
    ) -> Result<AnonymizedText> {
        let results = self.analyze(text, language).await?;
        let operators = if use_fake {
            fake_operators(&results)
        } else {
            BTreeMap::new()
        };
        let anonymized = self.anonymize(text, &results, &operators).await?;
        info!(
            "Anonymized {} entities ({} faked types)",
            results.len(),
            operators.len()
        );
        Ok(anonymized)
    }
}
