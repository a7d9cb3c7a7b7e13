//! Document ingestion: chunking, tabular rendering, and the loader that
//! walks a role-partitioned document tree into the index registry.

pub mod chunker;
pub mod loader;
pub mod tabular;

pub use chunker::{chunk_text, ChunkingConfig};
pub use loader::{DocumentLoader, LoadReport};
