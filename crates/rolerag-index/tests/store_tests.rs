use std::fs;

use tempfile::TempDir;

use rolerag_core::error::Error;
use rolerag_core::traits::Embedder;
use rolerag_core::types::{ChunkMeta, Role};
use rolerag_index::{IndexRegistry, RoleIndex};

/// Embeds text as a unit vector whose inner product with the query vector
/// `[1, 0]` equals the float found at the start of the text. Lets tests pin
/// exact similarity scores.
struct ScriptedEmbedder;

impl Embedder for ScriptedEmbedder {
    fn dim(&self) -> usize {
        2
    }

    fn embed_batch(&self, texts: &[String]) -> rolerag_core::error::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let s: f32 = t
                    .split_whitespace()
                    .next()
                    .and_then(|w| w.parse().ok())
                    .unwrap_or(0.0);
                vec![s, (1.0 - s * s).max(0.0).sqrt()]
            })
            .collect())
    }
}

fn meta(role: Role, i: usize) -> ChunkMeta {
    ChunkMeta::new(format!("docs/{role}/report.md"), role, i)
}

fn add_scored(index: &mut RoleIndex, role: Role, scores: &[f32]) {
    let documents: Vec<String> = scores.iter().map(|s| format!("{s} body text")).collect();
    let metas: Vec<ChunkMeta> = (0..scores.len()).map(|i| meta(role, i)).collect();
    let ids: Vec<String> = metas.iter().map(ChunkMeta::chunk_id).collect();
    index.add(&ScriptedEmbedder, documents, metas, ids).unwrap();
}

#[test]
fn empty_index_search_returns_empty_not_error() {
    let tmp = TempDir::new().unwrap();
    let index = RoleIndex::open(tmp.path(), Role::Finance, 2).unwrap();
    for k in [0usize, 1, 10] {
        let hits = index.search(&ScriptedEmbedder, "1.0 anything", k).unwrap();
        assert!(hits.is_empty());
    }
}

#[test]
fn empty_query_and_zero_k_return_empty() {
    let tmp = TempDir::new().unwrap();
    let mut index = RoleIndex::open(tmp.path(), Role::Finance, 2).unwrap();
    add_scored(&mut index, Role::Finance, &[0.9]);

    assert!(index.search(&ScriptedEmbedder, "", 5).unwrap().is_empty());
    assert!(index.search(&ScriptedEmbedder, "   ", 5).unwrap().is_empty());
    assert!(index.search(&ScriptedEmbedder, "1.0", 0).unwrap().is_empty());
}

#[test]
fn mismatched_lengths_fail_validation_and_leave_index_unchanged() {
    let tmp = TempDir::new().unwrap();
    let mut index = RoleIndex::open(tmp.path(), Role::Finance, 2).unwrap();

    let documents = vec!["0.1 a".to_string(), "0.2 b".to_string(), "0.3 c".to_string()];
    let metas = vec![meta(Role::Finance, 0), meta(Role::Finance, 1)];
    let ids = vec!["x".to_string(), "y".to_string(), "z".to_string()];

    let err = index.add(&ScriptedEmbedder, documents, metas, ids).unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");
    assert_eq!(index.len(), 0);
    // Nothing persisted either.
    assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
}

#[test]
fn search_ranks_by_descending_score() {
    let tmp = TempDir::new().unwrap();
    let mut index = RoleIndex::open(tmp.path(), Role::Finance, 2).unwrap();
    add_scored(&mut index, Role::Finance, &[0.9, 0.5, 0.2]);

    let hits = index.search(&ScriptedEmbedder, "1.0", 2).unwrap();
    assert_eq!(hits.len(), 2);
    assert!((hits[0].score - 0.9).abs() < 1e-5);
    assert!((hits[1].score - 0.5).abs() < 1e-5);
    assert_eq!(hits[0].meta.chunk_index, 0);
    assert_eq!(hits[1].meta.chunk_index, 1);
}

#[test]
fn search_truncates_to_corpus_size() {
    let tmp = TempDir::new().unwrap();
    let mut index = RoleIndex::open(tmp.path(), Role::Hr, 2).unwrap();
    add_scored(&mut index, Role::Hr, &[0.8, 0.3]);

    let hits = index.search(&ScriptedEmbedder, "1.0", 10).unwrap();
    assert_eq!(hits.len(), 2);
}

#[test]
fn equal_scores_keep_insertion_order() {
    let tmp = TempDir::new().unwrap();
    let mut index = RoleIndex::open(tmp.path(), Role::Hr, 2).unwrap();
    add_scored(&mut index, Role::Hr, &[0.5, 0.5, 0.5]);

    let hits = index.search(&ScriptedEmbedder, "1.0", 3).unwrap();
    let positions: Vec<usize> = hits.iter().map(|h| h.meta.chunk_index).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[test]
fn save_load_round_trip_preserves_everything() {
    let tmp = TempDir::new().unwrap();
    let (vectors, documents, metas);
    {
        let mut index = RoleIndex::open(tmp.path(), Role::Finance, 2).unwrap();
        add_scored(&mut index, Role::Finance, &[0.9, 0.5, 0.2]);
        vectors = index.vectors().to_vec();
        documents = index.documents().to_vec();
        metas = index.metas().to_vec();
    }

    let reloaded = RoleIndex::open(tmp.path(), Role::Finance, 2).unwrap();
    assert_eq!(reloaded.vectors(), vectors.as_slice());
    assert_eq!(reloaded.documents(), documents.as_slice());
    assert_eq!(reloaded.metas(), metas.as_slice());
}

#[test]
fn missing_artifact_means_no_existing_index() {
    let tmp = TempDir::new().unwrap();
    {
        let mut index = RoleIndex::open(tmp.path(), Role::Finance, 2).unwrap();
        add_scored(&mut index, Role::Finance, &[0.9]);
    }
    fs::remove_file(tmp.path().join("finance_docs.json")).unwrap();

    let reloaded = RoleIndex::open(tmp.path(), Role::Finance, 2).unwrap();
    assert!(reloaded.is_empty());
}

#[test]
fn corrupt_artifact_degrades_to_empty_index() {
    let tmp = TempDir::new().unwrap();
    {
        let mut index = RoleIndex::open(tmp.path(), Role::Finance, 2).unwrap();
        add_scored(&mut index, Role::Finance, &[0.9]);
    }
    fs::write(tmp.path().join("finance_meta.json"), "not json").unwrap();

    let reloaded = RoleIndex::open(tmp.path(), Role::Finance, 2).unwrap();
    assert!(reloaded.is_empty());
}

#[test]
fn dimension_mismatch_on_load_starts_empty() {
    let tmp = TempDir::new().unwrap();
    {
        let mut index = RoleIndex::open(tmp.path(), Role::Finance, 2).unwrap();
        add_scored(&mut index, Role::Finance, &[0.9]);
    }

    let reloaded = RoleIndex::open(tmp.path(), Role::Finance, 4).unwrap();
    assert!(reloaded.is_empty());
}

#[test]
fn failed_persistence_rolls_back_the_append() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("store");
    fs::create_dir_all(&dir).unwrap();

    let mut index = RoleIndex::open(&dir, Role::Finance, 2).unwrap();
    add_scored(&mut index, Role::Finance, &[0.9]);
    assert_eq!(index.len(), 1);

    // Pull the directory out from under the index so the next save fails.
    fs::remove_dir_all(&dir).unwrap();
    let err = index
        .add(
            &ScriptedEmbedder,
            vec!["0.5 more".to_string()],
            vec![meta(Role::Finance, 1)],
            vec!["id".to_string()],
        )
        .unwrap_err();
    assert!(matches!(err, Error::Storage { .. }), "got {err:?}");
    assert_eq!(index.len(), 1, "failed add must not commit in memory");
}

#[test]
fn registry_opens_every_role_and_routes_calls() {
    let tmp = TempDir::new().unwrap();
    let mut registry = IndexRegistry::open(tmp.path(), Box::new(ScriptedEmbedder)).unwrap();
    assert_eq!(registry.total_chunks(), 0);

    let metas = vec![meta(Role::Hr, 0)];
    let ids = vec![metas[0].chunk_id()];
    registry
        .add_documents(Role::Hr, vec!["0.8 handbook".to_string()], metas, ids)
        .unwrap();

    assert_eq!(registry.index(Role::Hr).len(), 1);
    assert_eq!(registry.index(Role::Finance).len(), 0);
    assert_eq!(registry.total_chunks(), 1);

    let hits = registry.search(Role::Hr, "1.0", 5).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].meta.role, Role::Hr);

    // A fresh registry sees the persisted state.
    drop(registry);
    let registry = IndexRegistry::open(tmp.path(), Box::new(ScriptedEmbedder)).unwrap();
    assert_eq!(registry.index(Role::Hr).len(), 1);
    assert_eq!(registry.index(Role::Hr).role(), Role::Hr);
}

#[test]
fn flush_restores_externally_deleted_artifacts() {
    let tmp = TempDir::new().unwrap();
    let mut registry = IndexRegistry::open(tmp.path(), Box::new(ScriptedEmbedder)).unwrap();
    let metas = vec![meta(Role::Hr, 0)];
    let ids = vec![metas[0].chunk_id()];
    registry
        .add_documents(Role::Hr, vec!["0.8 handbook".to_string()], metas, ids)
        .unwrap();

    // An operator deletes one artifact out from under the running process.
    fs::remove_file(tmp.path().join("hr_docs.json")).unwrap();
    registry.flush().unwrap();

    drop(registry);
    let registry = IndexRegistry::open(tmp.path(), Box::new(ScriptedEmbedder)).unwrap();
    assert_eq!(registry.index(Role::Hr).len(), 1);
    assert_eq!(registry.index(Role::Hr).documents(), ["0.8 handbook".to_string()]);
}
