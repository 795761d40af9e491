//! # Baystars News
//!
//! A batch pipeline that collects Yokohama DeNA Baystars news from six
//! independent sources, merges them into one deduplicated, newest-first
//! collection, and publishes Markdown articles with a rolling index.
//!
//! ## Usage
//!
//! ```sh
//! baystars_news                  # full pipeline into ./articles
//! baystars_news --fetch-only     # snapshot only
//! ```
//!
//! ## Architecture
//!
//! One run is a one-shot batch job:
//! 1. **Aggregate**: fetch all six sources concurrently (settle-all, a
//!    failed source contributes nothing), extract candidate records, dedup
//!    by title across sources, order newest-first, persist the snapshot
//! 2. **Compose**: turn each record into a Markdown article through the
//!    pluggable composition backend, sequentially and rate-limited
//! 3. **Index**: fold the new article metadata into the persistent,
//!    100-entry, newest-first index
//!
//! Per-source failures, extraction anomalies, and a corrupt index all
//! recover locally; only an unwritable output artifact aborts the run.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod compose;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use compose::DemoBackend;
use outputs::index::{self, FsIndexStore};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("baystars_news starting up");

    let args = Cli::parse();
    debug!(?args.articles_dir, args.fetch_only, "Parsed CLI arguments");

    // Early check: an unwritable articles dir is the one fatal condition,
    // so fail before any network work.
    ensure_writable_dir(&args.articles_dir).await?;

    // ---- Aggregate all sources into the snapshot ----
    let records = aggregate::run(&args.articles_dir).await?;
    info!(count = records.len(), "Snapshot persisted");

    if args.fetch_only {
        info!("Fetch-only run; skipping composition");
        return Ok(());
    }

    // ---- Compose articles and fold metadata into the index ----
    let batch = compose::compose_all(&DemoBackend, &records, &args.articles_dir).await?;
    info!(count = batch.len(), "Composed articles");

    let store = FsIndexStore::new(&args.articles_dir);
    let updated = index::accumulate(&store, batch).await?;
    info!(entries = updated.len(), "Article index updated");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
