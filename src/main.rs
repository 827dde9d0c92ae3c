//! vaultmind - personal knowledge-base assistant
//!
//! Entry point: syncs the vault's search index and answers queries.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use vaultmind::backend::{SearchBackend, SearchHit, SqliteBackend};
use vaultmind::notes::{self, tags};
use vaultmind::observability::init_tracing;
use vaultmind::search::Searcher;
use vaultmind::sync::SyncScheduler;
use vaultmind::{Config, Result};

/// Query and synchronize an Obsidian-style note vault
#[derive(Parser, Debug)]
#[command(name = "vaultmind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the note vault folder
    #[arg(short, long, env = "VAULTMIND_VAULT")]
    vault: std::path::PathBuf,

    /// Natural language query, answered from the search index
    #[arg(short, long)]
    query: Option<String>,

    /// Raw search: content text, `tag:#name`, or `file:title`
    #[arg(short, long)]
    search: Option<String>,

    /// Keep running and re-sync the vault periodically
    #[arg(short, long)]
    monitor: bool,

    /// Background sync interval in seconds
    #[arg(short, long, env = "VAULTMIND_INTERVAL", default_value = "1800")]
    interval: u64,

    /// Drop and rebuild the search index before syncing
    #[arg(long)]
    recreate: bool,

    /// Number of search results to return
    #[arg(long, env = "VAULTMIND_TOP_K", default_value = "10")]
    top_k: usize,

    /// Purge index entries for notes deleted from the vault
    #[arg(long, env = "VAULTMIND_PRUNE_DELETED")]
    prune_deleted: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "VAULTMIND_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "VAULTMIND_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_json);

    let config = Config {
        vault_dir: cli.vault,
        sync_interval_secs: cli.interval,
        top_k: cli.top_k,
        prune_deleted: cli.prune_deleted,
        log_level: cli.log_level,
        ..Config::default()
    };

    config.validate()?;
    config.ensure_assistant_dir()?;

    tracing::info!(
        vault = %config.vault_dir.display(),
        "vaultmind v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if cli.recreate {
        // A recreated index starts empty, so the fingerprint state must be
        // reset with it or every note would be classified as unchanged.
        match std::fs::remove_file(config.fingerprint_path()) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    let backend: Arc<dyn SearchBackend> =
        Arc::new(SqliteBackend::open(config.index_db_path(), cli.recreate)?);
    let scheduler = SyncScheduler::new(&config, Arc::clone(&backend))?;

    let report = scheduler.sync_once().await?;
    tracing::info!(
        scanned = report.scanned,
        upserted = report.upserted,
        "Initial sync complete"
    );

    if let Some(query) = &cli.query {
        let searcher = Searcher::new(Arc::clone(&backend));
        print_hits(&searcher.search(query, config.top_k)?);
    } else if let Some(raw) = &cli.search {
        run_raw_search(&config, &backend, raw)?;
    } else if !cli.monitor {
        println!("Please provide --query, --search, or --monitor");
        return Ok(());
    }

    if cli.monitor {
        scheduler.start(Duration::from_secs(config.sync_interval_secs));
        tokio::signal::ctrl_c().await?;
        tracing::info!("Interrupt received, shutting down");
        scheduler.stop().await;
    }

    Ok(())
}

/// Route a raw search by its prefix: tags and filenames are answered from
/// the vault directly, anything else goes to the search index.
fn run_raw_search(config: &Config, backend: &Arc<dyn SearchBackend>, raw: &str) -> Result<()> {
    if let Some(tag) = raw.strip_prefix("tag:") {
        print_paths(&tags::search_by_tag(&config.vault_dir, tag));
    } else if let Some(name) = raw.strip_prefix("file:") {
        print_paths(&notes::search_note_file(&config.vault_dir, name));
    } else {
        let searcher = Searcher::new(Arc::clone(backend));
        print_hits(&searcher.search(raw, config.top_k)?);
    }
    Ok(())
}

fn print_hits(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No matching notes found.");
        return;
    }
    for hit in hits {
        println!("{}  (score {:.2})", hit.rel_path, hit.score);
        if !hit.snippet.is_empty() {
            println!("    {}", hit.snippet);
        }
    }
}

fn print_paths(paths: &[String]) {
    if paths.is_empty() {
        println!("No matching notes found.");
        return;
    }
    for path in paths {
        println!("{path}");
    }
}
