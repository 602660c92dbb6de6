//! Clan-tag normalization helpers.
//!
//! The game API addresses clans and players by tags like `#2PP0YL9Y`. Tags
//! arrive from the roster sheet and from URLs in every imaginable shape:
//! lowercase, missing the `#`, or with the letter `O` typed for the digit `0`
//! (the game never issues tags containing `O`).

/// Normalizes a raw tag to canonical form: trimmed, uppercased, `O` replaced
/// with `0`, and exactly one leading `#`.
pub fn normalize_tag(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('#')
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'O' => '0',
            upper => upper,
        })
        .collect();
    format!("#{}", cleaned)
}

/// Normalizes a tag and percent-encodes it for use in a URL path segment.
pub fn encode_tag(raw: &str) -> String {
    normalize_tag(raw).replace('#', "%23")
}
