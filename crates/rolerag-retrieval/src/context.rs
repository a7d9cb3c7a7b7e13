//! Token-budgeted prompt assembly.

use tracing::debug;

use rolerag_core::traits::TokenEstimator;
use rolerag_core::types::SearchHit;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant for internal company documents.";

const PROMPT_HEADER: &str = "You are an assistant with access to the following context:\n\n";
const PROMPT_FOOTER: &str = "Please provide a helpful response based on the context above. \
If the context doesn't contain relevant information, please say so. \
Cite the source file(s) and chunk(s) you used.";

/// Turns retrieved hits into a prompt that fits a token budget.
///
/// Trimming is two-phase and order-sensitive: a greedy forward pass accepts
/// rendered blocks in result order until the next one would overflow the
/// budget, then the full prompt (instructions + context + query) is measured
/// and whole blocks are evicted from the end of the accepted set until it
/// fits. The two phases select a different surviving set than a single
/// greedy pass would under tight budgets, and both are kept as-is.
pub struct ContextAssembler {
    estimator: Box<dyn TokenEstimator>,
    token_budget: usize,
}

impl ContextAssembler {
    pub fn new(estimator: Box<dyn TokenEstimator>, token_budget: usize) -> Self {
        Self { estimator, token_budget }
    }

    /// The budgeted context body alone, without instructions or query.
    pub fn assemble(&self, hits: &[SearchHit]) -> String {
        self.accept_blocks(hits).concat()
    }

    /// The full user prompt. Never fails: when nothing fits, the body is
    /// empty and only instructions plus the query go downstream.
    pub fn build_prompt(&self, hits: &[SearchHit], query: &str) -> String {
        let mut blocks = self.accept_blocks(hits);
        let mut prompt = render_prompt(&blocks.concat(), query);
        while self.estimator.estimate(&prompt) > self.token_budget && !blocks.is_empty() {
            blocks.pop();
            prompt = render_prompt(&blocks.concat(), query);
        }
        debug!(blocks = blocks.len(), "assembled context");
        prompt
    }

    fn accept_blocks(&self, hits: &[SearchHit]) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut total = 0usize;
        for hit in hits {
            let block = render_block(hit);
            let cost = self.estimator.estimate(&block);
            if total + cost > self.token_budget {
                break;
            }
            total += cost;
            blocks.push(block);
        }
        blocks
    }
}

fn render_block(hit: &SearchHit) -> String {
    format!(
        "Source: {} (chunk {})\nContent: {}\n\n",
        hit.meta.source, hit.meta.chunk_index, hit.document
    )
}

fn render_prompt(context: &str, query: &str) -> String {
    format!("{PROMPT_HEADER}{context}\nUser Query: {query}\n\n{PROMPT_FOOTER}")
}
