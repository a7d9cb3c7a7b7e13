//! Walks a role-partitioned document tree and feeds chunks into the index
//! registry. Directory layout: `root/{role}/**/*.{md,txt,csv}`.

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use walkdir::WalkDir;

use rolerag_core::error::{Error, Result};
use rolerag_core::types::{ChunkMeta, Role};
use rolerag_index::IndexRegistry;

use crate::chunker::{chunk_text, ChunkingConfig};
use crate::tabular::render_csv;

/// Outcome of a full tree load. One bad file never aborts the load; every
/// failure is recorded here instead of only being logged.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub files_indexed: usize,
    pub chunks_indexed: usize,
    pub failures: Vec<(PathBuf, String)>,
}

pub struct DocumentLoader {
    chunking: ChunkingConfig,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new(ChunkingConfig::default())
    }
}

impl DocumentLoader {
    pub fn new(chunking: ChunkingConfig) -> Self {
        Self { chunking }
    }

    /// Load every supported file under each `root/{role}` subdirectory.
    ///
    /// A subdirectory whose name is not a known role is recorded as a
    /// failure, as is any file that cannot be read, parsed, or indexed; the
    /// walk continues past both.
    pub fn load_all(&self, root: &Path, registry: &mut IndexRegistry) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        let entries = fs::read_dir(root).map_err(|e| Error::storage(root, e))?;
        let mut role_dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        role_dirs.sort();

        for dir in role_dirs {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let role = match name.parse::<Role>() {
                Ok(role) => role,
                Err(e) => {
                    warn!(directory = %dir.display(), "skipping non-role directory");
                    report.failures.push((dir, e.to_string()));
                    continue;
                }
            };
            self.load_role_dir(&dir, role, registry, &mut report);
        }

        info!(
            files = report.files_indexed,
            chunks = report.chunks_indexed,
            failures = report.failures.len(),
            "document load finished"
        );
        Ok(report)
    }

    fn load_role_dir(
        &self,
        dir: &Path,
        role: Role,
        registry: &mut IndexRegistry,
        report: &mut LoadReport,
    ) {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(role.to_string());

        for path in files {
            match self.index_file(&path, role, registry) {
                Ok(Some(chunks)) => {
                    report.files_indexed += 1;
                    report.chunks_indexed += chunks;
                }
                Ok(None) => {} // unsupported extension
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping file");
                    report.failures.push((path, e.to_string()));
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
    }

    /// Read, chunk, and index one file. `Ok(None)` means the extension is
    /// unsupported and the file was skipped silently.
    fn index_file(
        &self,
        path: &Path,
        role: Role,
        registry: &mut IndexRegistry,
    ) -> Result<Option<usize>> {
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        let content = match extension {
            "md" | "txt" => read_file_content(path)?,
            "csv" => render_csv(path)?,
            _ => return Ok(None),
        };

        let chunks = chunk_text(
            &content,
            self.chunking.chunk_size_words,
            self.chunking.overlap_words,
        );
        if chunks.is_empty() {
            return Ok(Some(0));
        }

        let source = path.to_string_lossy().to_string();
        let count = chunks.len();
        let metas: Vec<ChunkMeta> = (0..count)
            .map(|i| ChunkMeta::new(source.clone(), role, i))
            .collect();
        let ids: Vec<String> = metas.iter().map(ChunkMeta::chunk_id).collect();
        registry.add_documents(role, chunks, metas, ids)?;
        Ok(Some(count))
    }
}

fn read_file_content(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        // Fall back to lossy decoding for files that are not valid UTF-8.
        Err(_) => {
            let bytes = fs::read(path).map_err(|e| Error::storage(path, e))?;
            Ok(String::from_utf8_lossy(&bytes).to_string())
        }
    }
}
