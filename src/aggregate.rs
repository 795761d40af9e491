//! Aggregation of all sources into one deduplicated, time-ordered snapshot.
//!
//! The aggregator launches every source adapter concurrently and waits for
//! all of them to settle; a failed or panicked adapter contributes zero
//! records and never aborts its siblings. The merge step then re-establishes
//! determinism over the non-deterministic completion order: records are
//! concatenated in source-declaration order, deduplicated by trimmed title
//! (first occurrence wins, so an earlier-declared source beats a later one
//! on a tie), and stably sorted newest-first.

use crate::models::CandidateRecord;
use crate::outputs::snapshot;
use crate::scrapers::{self, SourceSpec};
use futures::future::join_all;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::error::Error;
use tracing::{info, instrument, warn};

/// Merge per-source batches into the final run output.
///
/// Pure function of its input: concatenates the batches in order, dedups by
/// trimmed title keeping the first occurrence, then stably sorts by
/// `fetched_at` descending. `sort_by` is stable, so records with equal
/// timestamps keep their concatenation order.
pub fn merge_records(batches: Vec<Vec<CandidateRecord>>) -> Vec<CandidateRecord> {
    let mut merged: Vec<CandidateRecord> = batches
        .into_iter()
        .flatten()
        .unique_by(|r| r.dedup_key().to_string())
        .collect();
    merged.sort_by(|a, b| b.fetched_at.cmp(&a.fetched_at));
    merged
}

/// Per-source record counts, reported after the merge.
pub fn source_stats(records: &[CandidateRecord]) -> BTreeMap<String, usize> {
    let mut stats = BTreeMap::new();
    for record in records {
        *stats.entry(record.source.clone()).or_insert(0) += 1;
    }
    stats
}

/// Run one aggregation pass: fetch all sources, merge, persist the snapshot.
///
/// Completion does not depend on any source succeeding; zero successful
/// sources yields an empty snapshot. Only a snapshot write failure is fatal.
#[instrument(level = "info", skip_all, fields(%articles_dir))]
pub async fn run(articles_dir: &str) -> Result<Vec<CandidateRecord>, Box<dyn Error>> {
    let specs = scrapers::sources();
    info!(sources = specs.len(), "Collecting from all sources");

    let handles: Vec<_> = specs
        .into_iter()
        .map(|spec: SourceSpec| {
            tokio::spawn(async move { scrapers::collect_source(&spec).await })
        })
        .collect();

    // Settle-all join: join_all preserves declaration order regardless of
    // which task finishes first, and a panicked task becomes an empty batch.
    let batches: Vec<Vec<CandidateRecord>> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| match joined {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = %e, "Source task did not complete; contributing no records");
                Vec::new()
            }
        })
        .collect();

    let records = merge_records(batches);
    info!(count = records.len(), "Merged candidate records");

    for (source, count) in source_stats(&records) {
        info!(%source, count, "Records per source");
    }

    snapshot::write_snapshot(&records, articles_dir).await?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(title: &str, source: &str, secs: i64) -> CandidateRecord {
        CandidateRecord {
            title: title.to_string(),
            url: format!("https://example.com/{source}/{secs}"),
            source: source.to_string(),
            fetched_at: Utc.timestamp_opt(1_756_000_000 + secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_merge_dedup_is_idempotent() {
        let batches = vec![
            vec![record("速報 逆転勝ち", "A", 0), record("先発が好投", "A", 0)],
            vec![record("速報 逆転勝ち", "B", 0)],
        ];

        let once = merge_records(batches);
        let twice = merge_records(vec![once.clone()]);
        assert_eq!(once.len(), 2);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.title, b.title);
            assert_eq!(a.url, b.url);
        }
    }

    #[test]
    fn test_first_declared_source_wins_title_ties() {
        let batches = vec![
            vec![record("速報", "A", 0)],
            vec![record("速報", "B", 0)],
        ];

        let merged = merge_records(batches);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, "A");
    }

    #[test]
    fn test_dedup_key_ignores_surrounding_whitespace() {
        let batches = vec![
            vec![record("速報 今日の結果", "A", 0)],
            vec![record("  速報 今日の結果  ", "B", 0)],
        ];

        let merged = merge_records(batches);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, "A");
    }

    #[test]
    fn test_ordering_newest_first() {
        let batches = vec![vec![
            record("三番目の記事タイトル", "A", 3),
            record("一番目の記事タイトル", "A", 1),
            record("二番目の記事タイトル", "A", 2),
        ]];

        let merged = merge_records(batches);
        let titles: Vec<_> = merged.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "三番目の記事タイトル",
                "二番目の記事タイトル",
                "一番目の記事タイトル"
            ]
        );
    }

    #[test]
    fn test_equal_timestamps_keep_declaration_order() {
        let batches = vec![
            vec![record("最初のソースの記事", "A", 0)],
            vec![record("次のソースの記事", "B", 0)],
            vec![record("最後のソースの記事", "C", 0)],
        ];

        let merged = merge_records(batches);
        let sources: Vec<_> = merged.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_partial_failure_keeps_surviving_batch() {
        // Five failed sources appear as empty batches.
        let batches = vec![
            Vec::new(),
            Vec::new(),
            vec![record("唯一成功したソースの記事", "C", 1)],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        ];

        let merged = merge_records(batches);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, "C");
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(merge_records(Vec::new()).is_empty());
        assert!(merge_records(vec![Vec::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn test_source_stats_counts_per_label() {
        let records = vec![
            record("一つ目の記事タイトル", "A", 1),
            record("二つ目の記事タイトル", "A", 2),
            record("三つ目の記事タイトル", "B", 3),
        ];

        let stats = source_stats(&records);
        assert_eq!(stats.get("A"), Some(&2));
        assert_eq!(stats.get("B"), Some(&1));
    }
}
