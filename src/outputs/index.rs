//! Persistent article index accumulation.
//!
//! The index is the only state shared across runs: a newest-first sequence
//! of generated article metadata, capped at 100 entries, stored as
//! `index.json` and always read-modify-written as one unit.
//!
//! The load/store pair is injected through the [`IndexStore`] trait so the
//! merge/truncate logic is testable without a filesystem, and so a locking
//! discipline could later be added without touching the accumulation
//! algorithm. No cross-run dedup is performed: the same story generated in
//! two runs can appear twice. That mirrors the upstream pipeline and is a
//! known limitation, not something this layer silently corrects.

use crate::models::ArticleMetadata;
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Maximum number of entries the index retains.
pub const INDEX_CAP: usize = 100;

/// Index filename under the articles directory.
pub const INDEX_FILENAME: &str = "index.json";

/// Injected persistence for the article index.
pub trait IndexStore {
    /// Load the current index. Absent or corrupt state recovers to empty.
    async fn load(&self) -> Vec<ArticleMetadata>;

    /// Replace the stored index wholesale. Failure here is fatal.
    async fn store(&self, index: &[ArticleMetadata]) -> Result<(), Box<dyn Error>>;
}

/// Prepend a batch to an existing index and truncate to the cap.
///
/// The new batch keeps its internal order and precedes everything already
/// stored. Pure function of its input.
pub fn merge_index(
    new_batch: Vec<ArticleMetadata>,
    existing: Vec<ArticleMetadata>,
) -> Vec<ArticleMetadata> {
    let mut merged = new_batch;
    merged.extend(existing);
    merged.truncate(INDEX_CAP);
    merged
}

/// Fold a batch of newly generated article metadata into the stored index.
///
/// Reads the current index through the store, prepends the batch, truncates
/// to [`INDEX_CAP`], and writes the result back as the complete replacement.
#[instrument(level = "info", skip_all, fields(batch = new_batch.len()))]
pub async fn accumulate<S: IndexStore>(
    store: &S,
    new_batch: Vec<ArticleMetadata>,
) -> Result<Vec<ArticleMetadata>, Box<dyn Error>> {
    let existing = store.load().await;
    let updated = merge_index(new_batch, existing);
    store.store(&updated).await?;
    info!(entries = updated.len(), "Updated article index");
    Ok(updated)
}

/// File-backed [`IndexStore`] using `index.json` under the articles dir.
#[derive(Debug)]
pub struct FsIndexStore {
    path: String,
}

impl FsIndexStore {
    pub fn new(articles_dir: &str) -> Self {
        Self {
            path: format!("{}/{}", articles_dir.trim_end_matches('/'), INDEX_FILENAME),
        }
    }
}

impl IndexStore for FsIndexStore {
    async fn load(&self) -> Vec<ArticleMetadata> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) => {
                info!(path = %self.path, error = %e, "No existing index; starting empty");
                return Vec::new();
            }
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %self.path, error = %e, "Index unparseable; recovering as empty");
            Vec::new()
        })
    }

    async fn store(&self, index: &[ArticleMetadata]) -> Result<(), Box<dyn Error>> {
        let json = serde_json::to_string_pretty(index)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }
}
