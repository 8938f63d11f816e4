//! Fixed-width text segmentation.

/// Split `text` into consecutive slices of at most `max_chars` characters.
///
/// Cuts fall at fixed character offsets with no regard for words, so a span
/// may end up severed across two segments. Concatenating the output yields
/// `text` exactly. A `max_chars` of zero is treated as one.
pub fn segment(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut segments = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            segments.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        segments.push(&text[start..]);
    }

    segments
}
