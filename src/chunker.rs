//! Script chunking for per-call TTS text limits.

/// Sentence delimiter the chunker splits on.
pub const SENTENCE_DELIMITER: &str = ". ";

/// Splits a narration script into segments of roughly `max_chunk_length` characters.
///
/// Sentences are never split. They are packed greedily while
/// `len(current) + len(next) < max_chunk_length`; a sentence that is longer than
/// the bound on its own becomes its own chunk. The delimiter is put back after
/// every sentence except the last one of the script, and each chunk is trimmed.
///
/// ```rust
/// use readio::chunker::chunk;
///
/// assert_eq!(chunk("A. B. C.", 4), vec!["A.", "B.", "C."]);
/// assert_eq!(chunk("Hello world.", 1000), vec!["Hello world."]);
/// assert!(chunk("", 10).is_empty());
/// ```
pub fn chunk(script: &str, max_chunk_length: usize) -> Vec<String> {
    let sentences: Vec<&str> = script.split(SENTENCE_DELIMITER).collect();
    let last = sentences.len() - 1;

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for (i, sentence) in sentences.iter().enumerate() {
        let sentence_len = sentence.chars().count();
        if current_len + sentence_len >= max_chunk_length {
            push_trimmed(&mut chunks, &current);
            current.clear();
            current_len = 0;
        }
        current.push_str(sentence);
        current_len += sentence_len;
        if i < last {
            current.push_str(SENTENCE_DELIMITER);
            current_len += SENTENCE_DELIMITER.len();
        }
    }
    push_trimmed(&mut chunks, &current);

    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Number of whitespace-separated words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
