//! Word-bounded document chunking.

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub chunk_size_words: usize,
    pub overlap_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size_words: 500, overlap_words: 50 }
    }
}

/// Split `text` into overlapping word-bounded chunks.
///
/// Paragraphs (blank-line separated) are greedily accumulated until adding
/// the next one would exceed `chunk_size_words`; the full chunk is then
/// emitted and the next chunk starts with the last `overlap_words` words of
/// it before the overflowing paragraph is appended. A single paragraph
/// longer than `chunk_size_words` is emitted as sliding windows of
/// `chunk_size_words` words stepping by `chunk_size_words - overlap_words`;
/// the same windowing applies when an overlap carry plus the next paragraph
/// overflows the budget, so no emitted chunk ever exceeds it.
/// Empty input yields no chunks, and a trailing partial accumulation is
/// always flushed. Pure and deterministic.
pub fn chunk_text(text: &str, chunk_size_words: usize, overlap_words: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for paragraph in text.split("\n\n") {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if current.len() + words.len() > chunk_size_words && !current.is_empty() {
            chunks.push(current.join(" "));
            if overlap_words > 0 {
                let keep_from = current.len().saturating_sub(overlap_words);
                current.drain(..keep_from);
            } else {
                current.clear();
            }
        }
        current.extend(words);
        // Window down any accumulation over the budget, whether from an
        // oversized paragraph or an overlap carry plus a near-budget
        // paragraph. The guard keeps the step positive for degenerate
        // overlap settings.
        if overlap_words < chunk_size_words {
            while current.len() > chunk_size_words {
                chunks.push(current[..chunk_size_words].join(" "));
                current.drain(..chunk_size_words - overlap_words);
            }
        }
    }
    if !current.is_empty() {
        chunks.push(current.join(" "));
    }
    chunks
}
