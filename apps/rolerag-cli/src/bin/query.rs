use std::env;

use rolerag_core::config::{expand_path, Config};
use rolerag_core::traits::WordCountEstimator;
use rolerag_core::types::RoleScope;
use rolerag_embed::default_embedder;
use rolerag_index::IndexRegistry;
use rolerag_retrieval::{ContextAssembler, Retriever};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load()?;

    let args: Vec<String> = env::args().skip(1).collect();
    let mut positional = Vec::new();
    let mut n_results = None;
    let mut show_prompt = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--n-results" => {
                if let Some(n) = args.get(i + 1).and_then(|v| v.parse::<usize>().ok()) {
                    n_results = Some(n);
                    i += 1;
                } else {
                    eprintln!("Error: -n requires a number");
                    std::process::exit(1);
                }
            }
            "--prompt" => show_prompt = true,
            _ if !args[i].starts_with('-') => positional.push(args[i].clone()),
            other => {
                eprintln!("Error: unknown flag {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }
    if positional.len() != 2 {
        eprintln!("Usage: rolerag-query <role|all> '<query>' [-n N] [--prompt]");
        std::process::exit(1);
    }
    let scope: RoleScope = match positional[0].parse() {
        Ok(scope) => scope,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let query = &positional[1];
    let n_results = n_results.unwrap_or_else(|| config.get_or("retrieval.n_results", 8));

    let index_dir =
        expand_path(config.get_or("data.index_dir", "resources/vector_store".to_string()));
    let registry = IndexRegistry::open(&index_dir, default_embedder())?;
    let retriever = Retriever::new(&registry);

    let hits = retriever.retrieve(scope, query, n_results)?;
    if hits.is_empty() {
        println!("No results for '{}' in scope '{}'", query, scope);
        return Ok(());
    }
    for (rank, hit) in hits.iter().enumerate() {
        let preview: String = hit.document.chars().take(120).collect();
        println!(
            "{:>2}. [{:.4}] {} | {}",
            rank + 1,
            hit.score,
            hit.meta.chunk_id(),
            preview
        );
    }

    if show_prompt {
        let budget = config.get_or("retrieval.token_budget", 3500);
        let assembler = ContextAssembler::new(Box::new(WordCountEstimator), budget);
        println!("\n--- prompt ({} token budget) ---", budget);
        println!("{}", assembler.build_prompt(&hits, query));
    }
    Ok(())
}
