/// Default bound for callers that do not pick their own chunk size
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 3500;

/// Split text into chunks that respect sentence boundaries.
/// Each chunk is at most `max_chars` characters; a single sentence longer
/// than the bound is hard-split into consecutive `max_chars`-sized slices.
///
/// Line-break runs are normalized to single spaces before splitting, the
/// sentence-ending punctuation stays attached to its sentence and the
/// separating whitespace is consumed. Chunks come out in source order and
/// are never empty after trimming; empty input yields no chunks.
pub fn chunk_at_sentences(text: &str, max_chars: usize) -> Vec<String> {
    let line_breaks = regex::Regex::new(r"[\r\n]+").unwrap();
    let normalized = line_breaks.replace_all(text, " ");

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for sentence in split_sentences(&normalized) {
        let sentence_chars = sentence.chars().count();
        let separator_chars = if current.is_empty() { 0 } else { 1 };

        // If adding this sentence would exceed the limit, save current chunk
        if current_chars + separator_chars + sentence_chars > max_chars {
            let flushed = current.trim();
            if !flushed.is_empty() {
                chunks.push(flushed.to_string());
            }
            current.clear();
            current_chars = 0;

            // A sentence longer than the bound is split by characters
            if sentence_chars > max_chars {
                let chars: Vec<char> = sentence.chars().collect();
                for slice in chars.chunks(max_chars) {
                    let piece: String = slice.iter().collect();
                    let piece = piece.trim();
                    if !piece.is_empty() {
                        chunks.push(piece.to_string());
                    }
                }
            } else {
                current.push_str(sentence);
                current_chars = sentence_chars;
            }
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(sentence);
            current_chars += separator_chars + sentence_chars;
        }
    }

    // Add any remaining chunk
    let flushed = current.trim();
    if !flushed.is_empty() {
        chunks.push(flushed.to_string());
    }

    chunks
}

/// Split on sentence-ending punctuation followed by whitespace. The
/// punctuation belongs to the preceding sentence, the whitespace separator
/// is dropped. Text with no boundary comes back as a single sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let boundary = regex::Regex::new(r"([.!?]+)\s+").unwrap();

    let mut sentences = Vec::new();
    let mut last_end = 0;

    for caps in boundary.captures_iter(text) {
        let punctuation_end = caps.get(1).unwrap().end();
        sentences.push(&text[last_end..punctuation_end]);
        last_end = caps.get(0).unwrap().end();
    }

    if last_end < text.len() {
        sentences.push(&text[last_end..]);
    }

    sentences
}
