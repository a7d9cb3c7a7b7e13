//! Deterministic hashing embedder.
//!
//! The real sentence-embedding model lives behind the [`Embedder`] trait and
//! is wired in by the host application. This crate provides the in-tree
//! implementation used for offline operation and tests: each whitespace
//! token is bucketed into a fixed-size vector with xxHash and the result is
//! L2-normalized, so inner products behave like cosine similarity and texts
//! sharing tokens score higher than unrelated ones.

use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

use rolerag_core::error::Result;
use rolerag_core::traits::Embedder;

pub const DEFAULT_DIM: usize = 384;

pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// Embedder used when the host application wires in no external model.
/// `APP_EMBED_DIM` overrides the vector dimension.
pub fn default_embedder() -> Box<dyn Embedder> {
    let dim = std::env::var("APP_EMBED_DIM")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_DIM);
    Box::new(HashEmbedder::new(dim))
}
