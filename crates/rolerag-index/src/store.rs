use std::cmp::Ordering;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::warn;

use rolerag_core::error::{Error, Result};
use rolerag_core::traits::Embedder;
use rolerag_core::types::{ChunkMeta, Role, SearchHit};

/// Bumped whenever the on-disk layout of the index artifact changes.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// On-disk form of the vector half of the index.
#[derive(Serialize, Deserialize)]
struct IndexArtifact {
    version: u32,
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

/// Flat inner-product index for a single role.
///
/// Three parallel sequences of equal length, indexed by insertion position:
/// embeddings, document texts, chunk metadata. An `add` either commits all
/// three (memory and disk) or none. Grows append-only; individual chunks are
/// never updated or deleted.
pub struct RoleIndex {
    role: Role,
    dir: PathBuf,
    dim: usize,
    vectors: Vec<Vec<f32>>,
    documents: Vec<String>,
    metas: Vec<ChunkMeta>,
}

impl RoleIndex {
    /// Load the persisted index for `role` from `dir`, or start empty when
    /// any artifact is missing. Unreadable or inconsistent artifacts also
    /// degrade to an empty index, with a warning, rather than failing.
    pub fn open(dir: &Path, role: Role, dim: usize) -> Result<Self> {
        let mut index = Self {
            role,
            dir: dir.to_path_buf(),
            dim,
            vectors: Vec::new(),
            documents: Vec::new(),
            metas: Vec::new(),
        };

        let index_path = index.index_path();
        let docs_path = index.docs_path();
        let meta_path = index.meta_path();
        if !(index_path.exists() && docs_path.exists() && meta_path.exists()) {
            return Ok(index);
        }

        let artifact: IndexArtifact = match read_artifact(&index_path) {
            Ok(a) => a,
            Err(e) => {
                warn!(role = %role, error = %e, "discarding unreadable index artifact");
                return Ok(index);
            }
        };
        let documents: Vec<String> = match read_artifact(&docs_path) {
            Ok(d) => d,
            Err(e) => {
                warn!(role = %role, error = %e, "discarding unreadable docs artifact");
                return Ok(index);
            }
        };
        let metas: Vec<ChunkMeta> = match read_artifact(&meta_path) {
            Ok(m) => m,
            Err(e) => {
                warn!(role = %role, error = %e, "discarding unreadable meta artifact");
                return Ok(index);
            }
        };

        if artifact.version != INDEX_FORMAT_VERSION {
            warn!(
                role = %role,
                found = artifact.version,
                expected = INDEX_FORMAT_VERSION,
                "index artifact has a different format version, starting empty"
            );
            return Ok(index);
        }
        if artifact.dim != dim {
            warn!(
                role = %role,
                found = artifact.dim,
                expected = dim,
                "index artifact was built with a different embedding dimension, starting empty"
            );
            return Ok(index);
        }
        if artifact.vectors.len() != documents.len() || documents.len() != metas.len() {
            warn!(
                role = %role,
                vectors = artifact.vectors.len(),
                documents = documents.len(),
                metas = metas.len(),
                "persisted artifacts disagree in length, starting empty"
            );
            return Ok(index);
        }

        index.vectors = artifact.vectors;
        index.documents = documents;
        index.metas = metas;
        Ok(index)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn metas(&self) -> &[ChunkMeta] {
        &self.metas
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Embed `documents` in one batch and append them, then persist. The
    /// three inputs must have equal length. On a persistence failure the
    /// in-memory append is rolled back and the error surfaces, so a retried
    /// call neither duplicates nor drops entries.
    pub fn add(
        &mut self,
        embedder: &dyn Embedder,
        documents: Vec<String>,
        metas: Vec<ChunkMeta>,
        ids: Vec<String>,
    ) -> Result<()> {
        if documents.len() != metas.len() || documents.len() != ids.len() {
            return Err(Error::Validation(format!(
                "length mismatch: {} documents, {} metadata records, {} ids",
                documents.len(),
                metas.len(),
                ids.len()
            )));
        }
        if documents.is_empty() {
            return Ok(());
        }

        let embeddings = embedder.embed_batch(&documents)?;
        if embeddings.len() != documents.len() {
            return Err(Error::Embedding(format!(
                "embedder returned {} vectors for {} documents",
                embeddings.len(),
                documents.len()
            )));
        }
        for e in &embeddings {
            if e.len() != self.dim {
                return Err(Error::Embedding(format!(
                    "embedder returned a {}-dim vector, index expects {}",
                    e.len(),
                    self.dim
                )));
            }
        }

        let prior_len = self.len();
        self.vectors.extend(embeddings);
        self.documents.extend(documents);
        self.metas.extend(metas);

        if let Err(e) = self.save() {
            self.vectors.truncate(prior_len);
            self.documents.truncate(prior_len);
            self.metas.truncate(prior_len);
            return Err(e);
        }
        Ok(())
    }

    /// Top-`k` hits by descending inner-product score; ties broken by
    /// ascending insertion position. An empty index, empty query, or
    /// `k == 0` yields an empty vec, never an error.
    pub fn search(
        &self,
        embedder: &dyn Embedder,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchHit>> {
        if self.is_empty() || k == 0 || query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut query_vecs = embedder.embed_batch(&[query.to_string()])?;
        if query_vecs.is_empty() {
            return Err(Error::Embedding("embedder returned no query vector".to_string()));
        }
        let query_vec = query_vecs.remove(0);

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .map(|v| dot(v, &query_vec))
            .enumerate()
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k.min(self.len()));

        Ok(scored
            .into_iter()
            .map(|(idx, score)| SearchHit {
                document: self.documents[idx].clone(),
                meta: self.metas[idx].clone(),
                score,
            })
            .collect())
    }

    /// Write all three artifacts. Each is serialized to a temp file in the
    /// target directory and atomically renamed over the final name, so a
    /// crash mid-save never leaves artifacts that disagree in length.
    pub fn save(&self) -> Result<()> {
        let artifact = IndexArtifact {
            version: INDEX_FORMAT_VERSION,
            dim: self.dim,
            vectors: self.vectors.clone(),
        };
        // Stage all three before renaming any, so a serialization failure
        // leaves the previous generation fully intact.
        let staged_index = stage_artifact(&self.dir, &artifact)?;
        let staged_docs = stage_artifact(&self.dir, &self.documents)?;
        let staged_meta = stage_artifact(&self.dir, &self.metas)?;

        commit_artifact(staged_index, &self.index_path())?;
        commit_artifact(staged_docs, &self.docs_path())?;
        commit_artifact(staged_meta, &self.meta_path())?;
        Ok(())
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(format!("{}_index.json", self.role))
    }

    fn docs_path(&self) -> PathBuf {
        self.dir.join(format!("{}_docs.json", self.role))
    }

    fn meta_path(&self) -> PathBuf {
        self.dir.join(format!("{}_meta.json", self.role))
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|e| Error::storage(path, e))?;
    serde_json::from_str(&raw).map_err(|e| Error::storage(path, e))
}

fn stage_artifact<T: Serialize>(dir: &Path, value: &T) -> Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::storage(dir, e))?;
    let json = serde_json::to_string(value).map_err(|e| Error::storage(dir, e))?;
    tmp.write_all(json.as_bytes())
        .map_err(|e| Error::storage(dir, e))?;
    Ok(tmp)
}

fn commit_artifact(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.persist(path).map_err(|e| Error::storage(path, e))?;
    Ok(())
}
