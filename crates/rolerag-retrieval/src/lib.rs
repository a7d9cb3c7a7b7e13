//! Query-time retrieval: per-role and federated search over the index
//! registry, token-budgeted context assembly, and the answer pipeline that
//! hands the assembled prompt to a completion client.

pub mod context;
pub mod pipeline;
pub mod retriever;

pub use context::ContextAssembler;
pub use pipeline::answer;
pub use retriever::Retriever;
