//! Merging per-segment detections.

use std::collections::HashMap;

use crate::parse::DetectionResult;

/// Concatenate segment results in order and dedup by `text`.
///
/// When a text repeats, the later entry replaces the earlier one in place:
/// a key keeps the position of its first occurrence and the value of its last.
pub fn merge_detections<I>(per_segment: I) -> Vec<DetectionResult>
where
    I: IntoIterator<Item = Vec<DetectionResult>>,
{
    let mut merged: Vec<DetectionResult> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for item in per_segment.into_iter().flatten() {
        match positions.get(&item.text) {
            Some(&pos) => merged[pos] = item,
            None => {
                positions.insert(item.text.clone(), merged.len());
                merged.push(item);
            }
        }
    }

    merged
}
