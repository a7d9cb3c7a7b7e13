use std::cmp::Ordering;

use tracing::debug;

use rolerag_core::error::Result;
use rolerag_core::types::{Role, RoleScope, SearchHit};
use rolerag_index::IndexRegistry;

/// Read-only search front over the [`IndexRegistry`].
pub struct Retriever<'a> {
    registry: &'a IndexRegistry,
}

impl<'a> Retriever<'a> {
    pub fn new(registry: &'a IndexRegistry) -> Self {
        Self { registry }
    }

    /// Top-`n_results` hits for `query` within `scope`.
    ///
    /// A concrete role delegates straight to that role's index. `All` asks
    /// every role for `n_results`, concatenates in [`Role::ALL`] order, and
    /// stable-sorts by descending score before truncating, so equal scores
    /// keep role-enumeration order and then per-role rank. A role with many
    /// relevant chunks can dominate the merged set; that is expected.
    pub fn retrieve(
        &self,
        scope: RoleScope,
        query: &str,
        n_results: usize,
    ) -> Result<Vec<SearchHit>> {
        match scope {
            RoleScope::Role(role) => self.registry.search(role, query, n_results),
            RoleScope::All => {
                let mut merged = Vec::new();
                for role in Role::ALL {
                    merged.extend(self.registry.search(role, query, n_results)?);
                }
                merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
                merged.truncate(n_results);
                debug!(hits = merged.len(), "federated retrieval merged");
                Ok(merged)
            }
        }
    }
}
