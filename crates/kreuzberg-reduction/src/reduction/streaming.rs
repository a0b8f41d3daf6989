//! Chunked processing for oversized inputs.
//!
//! Text longer than [`STREAMING_THRESHOLD`] characters is cut into pieces of at most
//! [`STREAMING_CHUNK_SIZE`] characters. A cut that would land mid-sentence is moved back to just
//! after the nearest `.`, `!`, `?` or newline found within [`BOUNDARY_SEARCH_WINDOW`]
//! characters; otherwise the hard cut stands. Each chunk runs through the same processor and
//! the results are joined with single spaces.
//!
//! Fenced code blocks or tables that straddle a cut are processed as two independent halves.

/// Inputs longer than this many characters are processed in chunks.
pub const STREAMING_THRESHOLD: usize = 1_000_000;

/// Maximum characters per chunk.
pub const STREAMING_CHUNK_SIZE: usize = 100_000;

/// How far back from a hard cut to look for a sentence delimiter.
pub const BOUNDARY_SEARCH_WINDOW: usize = 1_000;

const SENTENCE_DELIMITERS: [char; 4] = ['.', '!', '?', '\n'];

/// Whether `text` holds more than `limit` characters, without counting when the byte length
/// already settles it.
pub(crate) fn exceeds_char_limit(text: &str, limit: usize) -> bool {
    text.len() > limit && text.chars().count() > limit
}

/// Split `text` into consecutive slices that together reproduce it exactly.
pub(crate) fn split_into_chunks(text: &str, chunk_size: usize, search_window: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = text[start..]
            .char_indices()
            .nth(chunk_size)
            .map(|(offset, _)| start + offset)
            .unwrap_or(text.len());

        if end < text.len()
            && let Some((offset, delimiter)) = text[start..end]
                .char_indices()
                .rev()
                .take(search_window)
                .find(|(_, c)| SENTENCE_DELIMITERS.contains(c))
        {
            end = start + offset + delimiter.len_utf8();
        }

        chunks.push(&text[start..end]);
        start = end;
    }

    chunks
}

/// Run `processor` over each chunk of `text` and rejoin the results.
pub(crate) fn process_streaming<F>(text: &str, processor: F) -> String
where
    F: Fn(&str) -> String,
{
    let chunks = split_into_chunks(text, STREAMING_CHUNK_SIZE, BOUNDARY_SEARCH_WINDOW);
    tracing::debug!(
        "Streaming token reduction over {} chunks ({} bytes)",
        chunks.len(),
        text.len()
    );

    let mut result = String::with_capacity(text.len());
    for (index, chunk) in chunks.iter().enumerate() {
        if index > 0 {
            result.push(' ');
        }
        result.push_str(&processor(chunk));
    }

    result.trim().to_string()
}
