//! Per-role vector indices with durable persistence.
//!
//! [`store::RoleIndex`] is a flat inner-product index holding three parallel
//! sequences (embeddings, document texts, chunk metadata) that load from and
//! save to per-role artifacts on disk. [`registry::IndexRegistry`] owns one
//! index per [`rolerag_core::types::Role`] and routes add/search calls.

pub mod registry;
pub mod store;

pub use registry::IndexRegistry;
pub use store::RoleIndex;
