//! Whitespace normalization and length limiting for scraped text.

use std::sync::LazyLock;

use regex::Regex;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every whitespace run to a single space and trim both ends.
pub fn clean_text(text: &str) -> String {
    WS_RE.replace_all(text, " ").trim().to_string()
}

/// Keep the first `max_chars` characters and append `...` when `text` is longer.
///
/// Counts `char`s, not bytes, so Korean text is never cut inside a code point.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Number of characters (not bytes) in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
