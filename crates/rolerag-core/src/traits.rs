use crate::error::Result;

/// Batched text-to-vector boundary.
///
/// Implementations must return one vector of `dim()` floats per input, in
/// input order, and must unit-normalize their output: the index scores by
/// inner product, which equals cosine similarity only for unit vectors.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Estimates how many model tokens a piece of text will occupy.
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, text: &str) -> usize;
}

/// Synchronous completion boundary. No retry or timeout built in; callers
/// wrap this with their own policy.
pub trait CompletionClient: Send + Sync {
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// Word-count heuristic: English text averages ~0.75 words per token.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordCountEstimator;

impl TokenEstimator for WordCountEstimator {
    fn estimate(&self, text: &str) -> usize {
        let word_count = text.split_whitespace().count();
        (word_count as f32 / 0.75) as usize
    }
}
