//! Data models shared across the pipeline.
//!
//! Two shapes cross component boundaries:
//! - [`CandidateRecord`]: one extracted news item, scoped to a single
//!   aggregation run and persisted in the raw snapshot
//! - [`ArticleMetadata`]: the handle for one generated Markdown article,
//!   accumulated across runs in the persistent index
//!
//! The snapshot serializes the timestamp field under the `fetchedAt` wire
//! name, which is the handoff contract to the content-generation step, hence
//! the serde rename on that field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single news item extracted from one source during one aggregation run.
///
/// Records are created at extraction time, never mutated, and discarded once
/// the snapshot is written. The trimmed `title` is the dedup key both within
/// one adapter's output and across the whole run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CandidateRecord {
    /// Display text of the item, truncated to 150 code points.
    pub title: String,
    /// Absolute URL of the item (relative hrefs are resolved at extraction).
    pub url: String,
    /// Fixed label of the adapter that produced this record.
    pub source: String,
    /// Extraction timestamp; ordering key within one run.
    #[serde(rename = "fetchedAt")]
    pub fetched_at: DateTime<Utc>,
}

impl CandidateRecord {
    /// The normalized form of the title used as the dedup key.
    pub fn dedup_key(&self) -> &str {
        self.title.trim()
    }
}

/// Metadata for one generated article, as stored in the persistent index.
///
/// Produced by the composition step after a record has been turned into a
/// Markdown file. The index keeps at most the 100 newest of these, newest
/// batch first.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArticleMetadata {
    /// Title of the generated article (the source record's title).
    pub title: String,
    /// Publication date in `YYYY-MM-DD` format.
    pub date: String,
    /// Basename of the generated Markdown file.
    pub filename: String,
    /// Full path of the generated Markdown file.
    pub filepath: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_candidate_record_wire_format() {
        let record = CandidateRecord {
            title: "ベイスターズが逆転勝ち".to_string(),
            url: "https://www.baystars.co.jp/news/2025/08/0829_01.html".to_string(),
            source: "ベイスターズ公式".to_string(),
            fetched_at: Utc.with_ymd_and_hms(2025, 8, 29, 12, 0, 0).unwrap(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"fetchedAt\""));
        assert!(!json.contains("fetched_at"));

        let back: CandidateRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title, record.title);
        assert_eq!(back.fetched_at, record.fetched_at);
    }

    #[test]
    fn test_dedup_key_trims_whitespace() {
        let record = CandidateRecord {
            title: "  速報 今日の試合結果  ".to_string(),
            url: "https://example.com/a".to_string(),
            source: "テスト".to_string(),
            fetched_at: Utc::now(),
        };
        assert_eq!(record.dedup_key(), "速報 今日の試合結果");
    }

    #[test]
    fn test_article_metadata_roundtrip() {
        let meta = ArticleMetadata {
            title: "Test Article".to_string(),
            date: "2025-08-29".to_string(),
            filename: "2025-08-29-1-test-article.md".to_string(),
            filepath: "articles/2025-08-29-1-test-article.md".to_string(),
        };

        let json = serde_json::to_string(&meta).unwrap();
        let back: ArticleMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back.filename, meta.filename);
        assert_eq!(back.date, "2025-08-29");
    }
}
