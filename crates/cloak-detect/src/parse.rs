//! Decoding model replies.
//!
//! The model is asked for JSON but does not always comply. Every decoder
//! returns a `Result` so the caller can choose between skipping the unit of
//! work and failing the request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use cloak_core::{EntityType, Error, Result};

/// One detected PII span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Label chosen by the model, kept verbatim even outside the taxonomy.
    pub entity_type: String,
    /// Exact substring of the input.
    pub text: String,
}

impl DetectionResult {
    pub fn new(entity_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            text: text.into(),
        }
    }

    /// The taxonomy entry for this label, if the model used a known one.
    pub fn taxonomy_type(&self) -> Option<EntityType> {
        EntityType::from_label(&self.entity_type)
    }
}

fn decode(content: &str) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| Error::MalformedModelOutput(e.to_string()))
}

/// Decode a detect reply: `{"results": [{"entity_type", "text"}, ...]}`.
///
/// A JSON reply without a `results` list yields no detections.
pub fn parse_detections(content: &str) -> Result<Vec<DetectionResult>> {
    let value = decode(content)?;
    match value.get("results") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                DetectionResult::deserialize(item).map_err(|_| {
                    Error::MalformedModelOutput(format!(
                        "detection #{} lacks string entity_type/text",
                        i
                    ))
                })
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}

/// Decode an abstract reply. `Ok(None)` when the JSON has no `results` field.
pub fn parse_abstraction(content: &str) -> Result<Option<Value>> {
    let value = decode(content)?;
    Ok(value.get("results").cloned())
}

/// Span → spans judged to share its contextual meaning.
///
/// Every key is a member of its own list. Nothing else is guaranteed: the
/// relation need not be symmetric or transitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClusterMapping(BTreeMap<String, Vec<String>>);

impl ClusterMapping {
    /// Decode a cluster reply: a JSON object of span → list of spans.
    ///
    /// Non-string list members are dropped, a bare string value is read as a
    /// one-element list, duplicates are removed and each key is added to its
    /// own list when missing.
    pub fn parse(content: &str) -> Result<Self> {
        let value = decode(content)?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::MalformedModelOutput("cluster reply is not an object".into()))?;

        let mut mapping = BTreeMap::new();
        for (i, (key, spans)) in object.iter().enumerate() {
            let raw: Vec<&str> = match spans {
                Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
                Value::String(s) => vec![s.as_str()],
                _ => {
                    return Err(Error::MalformedModelOutput(format!(
                        "cluster entry #{} is not a list",
                        i
                    )))
                }
            };

            let mut group: Vec<String> = Vec::with_capacity(raw.len() + 1);
            if !raw.contains(&key.as_str()) {
                group.push(key.clone());
            }
            for span in raw {
                if !group.iter().any(|g| g == span) {
                    group.push(span.to_string());
                }
            }
            mapping.insert(key.clone(), group);
        }

        Ok(Self(mapping))
    }

    pub fn get(&self, span: &str) -> Option<&[String]> {
        self.0.get(span).map(Vec::as_slice)
    }
}
