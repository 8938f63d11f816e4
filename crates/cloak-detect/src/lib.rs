//! PII detection pipeline.
//!
//! Long input is cut into fixed-size segments, each segment goes to the model
//! on its own, and the per-segment detections are merged with dedup by text.
//! Segments whose reply cannot be used are skipped. The cluster and abstract
//! adapters make a single call and surface every failure to the caller.
//! `presidio` is the rule-based path through the analyzer/anonymizer services.

pub mod merge;
pub mod parse;
pub mod pipeline;
pub mod presidio;
pub mod segment;

pub use merge::merge_detections;
pub use parse::{ClusterMapping, DetectionResult};
pub use pipeline::{ClusterReply, DetectionOutcome, PiiPipeline};
pub use presidio::{AnonymizedText, PresidioClient, RecognizerResult};
pub use segment::segment;
