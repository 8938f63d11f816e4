//! Detect / cluster / abstract over the model dispatcher.

use serde_json::Value;
use tracing::{debug, info, warn};

use cloak_chat::prompts;
use cloak_chat::{ModelDispatcher, Task};
use cloak_core::Result;

use crate::merge::merge_detections;
use crate::parse::{self, ClusterMapping, DetectionResult};
use crate::segment::segment;

/// Merged detections plus how the segments fared.
#[derive(Debug, Clone)]
pub struct DetectionOutcome {
    pub results: Vec<DetectionResult>,
    pub segments: usize,
    pub skipped: usize,
}

/// Raw cluster reply and its decoded mapping when it decodes.
#[derive(Debug, Clone)]
pub struct ClusterReply {
    pub raw: String,
    pub mapping: Option<ClusterMapping>,
}

pub struct PiiPipeline {
    dispatcher: ModelDispatcher,
    max_segment_length: usize,
}

impl PiiPipeline {
    pub fn new(dispatcher: ModelDispatcher, max_segment_length: usize) -> Self {
        Self {
            dispatcher,
            max_segment_length,
        }
    }

    /// Detect PII segment by segment.
    ///
    /// A segment whose call fails or whose reply cannot be decoded is logged
    /// and skipped; the rest of the batch still runs.
    pub async fn detect(&self, message: &str) -> DetectionOutcome {
        let segments = segment(message, self.max_segment_length);
        let mut per_segment = Vec::with_capacity(segments.len());
        let mut skipped = 0;

        for (index, seg) in segments.iter().enumerate() {
            let reply = match self.dispatcher.dispatch(Task::Detect, seg).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Segment {} skipped, dispatch failed: {}", index, e);
                    skipped += 1;
                    continue;
                }
            };
            debug!("Segment {} reply: {} bytes", index, reply.len());

            match parse::parse_detections(&reply) {
                Ok(found) => per_segment.push(found),
                Err(e) => {
                    warn!("Segment {} skipped, unusable reply: {}", index, e);
                    skipped += 1;
                }
            }
        }

        let results = merge_detections(per_segment);
        let off_taxonomy = results
            .iter()
            .filter(|r| r.taxonomy_type().is_none())
            .count();
        info!(
            "Detected {} spans over {} segments ({} skipped, {} with unknown labels)",
            results.len(),
            segments.len(),
            skipped,
            off_taxonomy
        );

        DetectionOutcome {
            results,
            segments: segments.len(),
            skipped,
        }
    }

    /// Ask which spans share each given span's meaning. Failures propagate.
    pub async fn cluster(&self, message: &str, spans: Option<&[String]>) -> Result<ClusterReply> {
        let input = match spans {
            Some(spans) => prompts::cluster_input(message, spans),
            None => message.to_string(),
        };
        let raw = self.dispatcher.dispatch(Task::Cluster, &input).await?;

        let mapping = match ClusterMapping::parse(&raw) {
            Ok(mapping) => Some(mapping),
            Err(e) => {
                debug!("Cluster reply kept raw: {}", e);
                None
            }
        };

        Ok(ClusterReply { raw, mapping })
    }

    /// Rewrite `message` without the protected spans.
    ///
    /// `Ok(None)` when the model answered with JSON lacking `results`.
    /// Dispatch failures and non-JSON replies propagate.
    pub async fn abstract_text(
        &self,
        message: &str,
        protected: Option<&[String]>,
    ) -> Result<Option<Value>> {
        let input = match protected {
            Some(protected) => prompts::abstract_input(message, protected),
            None => message.to_string(),
        };
        let raw = self.dispatcher.dispatch(Task::Abstract, &input).await?;
        parse::parse_abstraction(&raw)
    }
}
