//! Sanitization of untrusted free text before persistence.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Single-pass tag stripper, not an HTML parser; malformed or nested
    // markup may be only partially removed.
    static ref TAG_PATTERN: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// Trim surrounding whitespace, truncate to `max_length` characters, then
/// strip anything that looks like an HTML/XML tag.
///
/// Pure and deterministic; empty input yields an empty string.
pub fn sanitize(text: &str, max_length: usize) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let truncated: String = trimmed.chars().take(max_length).collect();
    TAG_PATTERN.replace_all(&truncated, "").into_owned()
}
