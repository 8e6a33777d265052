//! Paragraph normalization and splitting.

/// Normalize raw source text for segmentation.
///
/// Strips carriage returns and collapses every run of two or more spaces to
/// a single space. Newlines pass through untouched; they are the paragraph
/// separators consumed by [`split_paragraphs`].
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for ch in text.chars() {
        match ch {
            '\r' => {}
            ' ' => {
                if !prev_space {
                    out.push(' ');
                }
                prev_space = true;
            }
            _ => {
                out.push(ch);
                prev_space = false;
            }
        }
    }
    out
}

/// Split source text into non-empty, trimmed paragraphs.
///
/// The whole list is recomputed on every call; there is no incremental
/// update path.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let normalized = normalize_text(text);
    let paragraphs: Vec<String> = normalized
        .split('\n')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    log::debug!(
        "split {} paragraphs from {} source chars",
        paragraphs.len(),
        text.chars().count()
    );
    paragraphs
}
