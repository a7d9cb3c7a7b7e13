//! Retrieve → assemble → complete.

use tracing::info;

use rolerag_core::error::Result;
use rolerag_core::traits::CompletionClient;
use rolerag_core::types::RoleScope;

use crate::context::{ContextAssembler, SYSTEM_PROMPT};
use crate::retriever::Retriever;

/// Answer `query` within `scope`: retrieve the top `n_results` chunks,
/// build a budgeted prompt, and hand it to the completion client. The
/// completion call is made once; failures propagate without retry.
pub fn answer(
    retriever: &Retriever<'_>,
    assembler: &ContextAssembler,
    completion: &dyn CompletionClient,
    scope: RoleScope,
    query: &str,
    n_results: usize,
) -> Result<String> {
    let hits = retriever.retrieve(scope, query, n_results)?;
    info!(scope = %scope, hits = hits.len(), "retrieved context");
    let prompt = assembler.build_prompt(&hits, query);
    completion.complete(SYSTEM_PROMPT, &prompt)
}
