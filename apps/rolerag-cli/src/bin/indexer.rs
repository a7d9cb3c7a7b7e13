use std::env;

use rolerag_core::config::{expand_path, Config};
use rolerag_embed::default_embedder;
use rolerag_index::IndexRegistry;
use rolerag_ingest::{ChunkingConfig, DocumentLoader};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    let args: Vec<String> = env::args().skip(1).collect();
    let mut docs_dir = None;
    let mut index_dir = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--index-dir" => {
                if i + 1 < args.len() {
                    index_dir = Some(args[i + 1].clone());
                    i += 1;
                } else {
                    eprintln!("Error: --index-dir requires a path");
                    std::process::exit(1);
                }
            }
            _ if !args[i].starts_with('-') => docs_dir = Some(args[i].clone()),
            other => {
                eprintln!("Error: unknown flag {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }
    // Paths from flags or config may carry `~` or `${VAR}`.
    let docs_dir = expand_path(
        docs_dir.unwrap_or_else(|| config.get_or("data.docs_dir", "resources/data".to_string())),
    );
    let index_dir = expand_path(index_dir.unwrap_or_else(|| {
        config.get_or("data.index_dir", "resources/vector_store".to_string())
    }));
    let chunking = ChunkingConfig {
        chunk_size_words: config.get_or("chunking.chunk_size_words", 500),
        overlap_words: config.get_or("chunking.overlap_words", 50),
    };

    println!("rolerag indexer\n===============");
    println!("Documents: {}", docs_dir.display());
    println!("Index store: {}", index_dir.display());

    let mut registry = IndexRegistry::open(&index_dir, default_embedder())?;
    let loader = DocumentLoader::new(chunking);
    let report = loader.load_all(&docs_dir, &mut registry)?;

    println!(
        "Indexed {} files into {} chunks ({} total in store)",
        report.files_indexed,
        report.chunks_indexed,
        registry.total_chunks()
    );
    if !report.failures.is_empty() {
        println!("{} file(s) failed:", report.failures.len());
        for (path, reason) in &report.failures {
            println!("  {}: {}", path.display(), reason);
        }
    }
    println!("\nTo search, use: cargo run --bin rolerag-query '<role|all>' '<query>'");
    Ok(())
}
