//! Raw snapshot output.
//!
//! Serializes one run's merged candidate records to `raw-articles.json`,
//! fully overwriting the previous snapshot. This file is the handoff
//! contract to the content-generation step; a failure to write it is the
//! one fatal condition in the pipeline.

use crate::models::CandidateRecord;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Snapshot filename under the articles directory.
pub const SNAPSHOT_FILENAME: &str = "raw-articles.json";

/// Write the merged records as the complete snapshot.
#[instrument(level = "info", skip_all, fields(%articles_dir, count = records.len()))]
pub async fn write_snapshot(
    records: &[CandidateRecord],
    articles_dir: &str,
) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(records)?;

    if let Err(e) = fs::create_dir_all(articles_dir).await {
        error!(%articles_dir, error = %e, "Failed to create articles dir");
        return Err(e.into());
    }

    let path = format!("{}/{}", articles_dir.trim_end_matches('/'), SNAPSHOT_FILENAME);
    fs::write(&path, json).await?;
    info!(%path, "Wrote raw snapshot");
    Ok(())
}

/// Read the current snapshot back, for the composition step.
///
/// A missing or unreadable snapshot is an empty batch, not an error.
#[instrument(level = "info", skip_all, fields(%articles_dir))]
pub async fn read_snapshot(articles_dir: &str) -> Vec<CandidateRecord> {
    let path = format!("{}/{}", articles_dir.trim_end_matches('/'), SNAPSHOT_FILENAME);
    match fs::read_to_string(&path).await {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(%path, error = %e, "Snapshot unparseable; treating as empty");
            Vec::new()
        }),
        Err(e) => {
            tracing::warn!(%path, error = %e, "Snapshot missing; treating as empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn temp_dir(tag: &str) -> String {
        let dir = std::env::temp_dir().join(format!("baystars_snapshot_{tag}_{}", std::process::id()));
        dir.to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip_overwrites() {
        let dir = temp_dir("roundtrip");
        let first = vec![CandidateRecord {
            title: "最初のスナップショット記事".to_string(),
            url: "https://example.com/1".to_string(),
            source: "テスト".to_string(),
            fetched_at: Utc::now(),
        }];

        write_snapshot(&first, &dir).await.unwrap();
        assert_eq!(read_snapshot(&dir).await.len(), 1);

        // Second run replaces the snapshot wholesale.
        write_snapshot(&[], &dir).await.unwrap();
        assert!(read_snapshot(&dir).await.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_snapshot_reads_empty() {
        let dir = temp_dir("missing");
        assert!(read_snapshot(&dir).await.is_empty());
    }
}
