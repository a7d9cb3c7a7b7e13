use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use rolerag_core::error::{Error, Result};
use rolerag_core::traits::Embedder;
use rolerag_core::types::{ChunkMeta, Role, SearchHit};

use crate::store::RoleIndex;

/// Owns one [`RoleIndex`] per role and routes add/search calls.
///
/// Constructed once at process start; there are no ambient singletons. All
/// indices are loaded (or created empty) at `open`, so every concrete role
/// is always present. Mutating calls take a concrete [`Role`]; the "all"
/// pseudo-role exists only at the query layer.
pub struct IndexRegistry {
    dir: PathBuf,
    embedder: Box<dyn Embedder>,
    indices: BTreeMap<Role, RoleIndex>,
}

impl IndexRegistry {
    /// Load or create the index for every known role under `dir`.
    pub fn open(dir: &Path, embedder: Box<dyn Embedder>) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| Error::storage(dir, e))?;
        let mut indices = BTreeMap::new();
        for role in Role::ALL {
            let index = RoleIndex::open(dir, role, embedder.dim())?;
            if !index.is_empty() {
                info!(role = %index.role(), chunks = index.len(), "loaded persisted index");
            }
            indices.insert(role, index);
        }
        Ok(Self { dir: dir.to_path_buf(), embedder, indices })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn index(&self, role: Role) -> &RoleIndex {
        &self.indices[&role]
    }

    /// Total chunks across all roles.
    pub fn total_chunks(&self) -> usize {
        self.indices.values().map(RoleIndex::len).sum()
    }

    pub fn add_documents(
        &mut self,
        role: Role,
        documents: Vec<String>,
        metas: Vec<ChunkMeta>,
        ids: Vec<String>,
    ) -> Result<()> {
        let embedder = self.embedder.as_ref();
        let index = self
            .indices
            .get_mut(&role)
            .ok_or_else(|| Error::UnknownRole(role.to_string()))?;
        index.add(embedder, documents, metas, ids)
    }

    pub fn search(&self, role: Role, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        self.indices[&role].search(self.embedder.as_ref(), query, k)
    }

    /// Re-persist every non-empty index. Adds already save on commit, so
    /// this is only needed after external artifact deletion.
    pub fn flush(&self) -> Result<()> {
        for index in self.indices.values() {
            if !index.is_empty() {
                index.save()?;
            }
        }
        Ok(())
    }
}
