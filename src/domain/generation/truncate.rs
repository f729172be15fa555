/// Word cap used for stored prompt previews
pub const DEFAULT_MAX_PREVIEW_WORDS: usize = 200;

/// Truncate text to at most `max_words` whitespace-separated words.
/// Short text is returned unchanged; truncated text is rejoined with
/// single spaces and gets a literal `...` suffix.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_string();
    }

    let mut truncated = words[..max_words].join(" ");
    truncated.push_str("...");
    truncated
}
