//! News source adapters.
//!
//! Each source is described by a declarative [`SourceSpec`] consumed by one
//! shared extraction routine in [`extract`], rather than six copies of the
//! same scan-filter-cap control flow.
//!
//! # Sources
//!
//! | Source | Method | Inclusion rule |
//! |--------|--------|----------------|
//! | ベイスターズ公式 | HTML anchors | href contains `/news/` |
//! | Yahoo!ニュース | HTML anchors (`a[href*="npb"]`) | text excludes `チケット` |
//! | スポーツナビ | HTML anchors | text excludes `チケット` |
//! | Google ニュース | RSS `<item>` elements | shared filter only |
//! | 日刊スポーツ | HTML anchors | href contains `baseball` |
//! | 毎日新聞 | HTML anchors | text contains `ベイスターズ` |
//!
//! All adapters share the same base filter (non-empty link, trimmed text
//! strictly between 5 and 200 code points), truncate titles to 150 code
//! points, dedup their own output by trimmed title, and cap it at 10 records
//! in document order. Extraction anomalies are contained per adapter: logged
//! and converted to an empty result, never a failed run.

pub mod extract;

use crate::fetch::fetch_page;
use crate::models::CandidateRecord;
use tracing::{info, instrument, warn};

/// How candidate items are located in a source's response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Scan anchor elements matched by a CSS selector.
    Html,
    /// Scan `<item>` elements of an RSS feed.
    Rss,
}

/// Declarative description of one news source.
///
/// The shared extraction routine reads link target and display text per
/// matched element, then applies the base filter plus whichever of the
/// optional substring tests are set.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    /// Fixed label stamped into every record this adapter produces.
    pub label: &'static str,
    /// Page or feed endpoint to fetch.
    pub page_url: String,
    /// Origin used to resolve relative link targets.
    pub base_origin: &'static str,
    pub kind: SourceKind,
    /// CSS selector locating candidate elements (HTML sources only).
    pub selector: &'static str,
    /// Link target must contain this substring.
    pub link_must_contain: Option<&'static str>,
    /// Display text must contain this substring.
    pub text_must_contain: Option<&'static str>,
    /// Display text must not contain this substring.
    pub text_must_not_contain: Option<&'static str>,
}

/// The six news sources, in declaration order.
///
/// Declaration order matters: when two sources report the same title, the
/// aggregator keeps the record from the source declared first.
pub fn sources() -> Vec<SourceSpec> {
    vec![
        SourceSpec {
            label: "ベイスターズ公式",
            page_url: "https://www.baystars.co.jp/news/".to_string(),
            base_origin: "https://www.baystars.co.jp",
            kind: SourceKind::Html,
            selector: "a",
            link_must_contain: Some("/news/"),
            text_must_contain: None,
            text_must_not_contain: None,
        },
        SourceSpec {
            label: "Yahoo!ニュース",
            page_url: "https://baseball.yahoo.co.jp/npb/teams/3/".to_string(),
            base_origin: "https://baseball.yahoo.co.jp",
            kind: SourceKind::Html,
            selector: r#"a[href*="npb"]"#,
            link_must_contain: None,
            text_must_contain: None,
            text_must_not_contain: Some("チケット"),
        },
        SourceSpec {
            label: "スポーツナビ",
            page_url: "https://sports.yahoo.co.jp/baseball/npb/teams/3/".to_string(),
            base_origin: "https://sports.yahoo.co.jp",
            kind: SourceKind::Html,
            selector: "a",
            link_must_contain: None,
            text_must_contain: None,
            text_must_not_contain: Some("チケット"),
        },
        SourceSpec {
            label: "Google ニュース",
            page_url: format!(
                "https://news.google.com/rss/search?q={}&hl=ja&gl=JP&ceid=JP:ja",
                urlencoding::encode("ベイスターズ")
            ),
            base_origin: "https://news.google.com",
            kind: SourceKind::Rss,
            selector: "item",
            link_must_contain: None,
            text_must_contain: None,
            text_must_not_contain: None,
        },
        SourceSpec {
            label: "日刊スポーツ",
            page_url: "https://www.nikkansports.com/baseball/npb/teams/3.html".to_string(),
            base_origin: "https://www.nikkansports.com",
            kind: SourceKind::Html,
            selector: "a",
            link_must_contain: Some("baseball"),
            text_must_contain: None,
            text_must_not_contain: None,
        },
        SourceSpec {
            label: "毎日新聞",
            page_url: "https://mainichi.jp/sports/articles/?category=baseball".to_string(),
            base_origin: "https://mainichi.jp",
            kind: SourceKind::Html,
            selector: "a",
            link_must_contain: None,
            text_must_contain: Some("ベイスターズ"),
            text_must_not_contain: None,
        },
    ]
}

/// Fetch one source and extract its candidate records.
///
/// A fetch failure contributes zero records; it never fails the caller.
#[instrument(level = "info", skip_all, fields(source = %spec.label))]
pub async fn collect_source(spec: &SourceSpec) -> Vec<CandidateRecord> {
    let Some(body) = fetch_page(&spec.page_url).await else {
        warn!(source = %spec.label, url = %spec.page_url, "Source fetch produced no body");
        return Vec::new();
    };

    let records = extract::extract(spec, &body);
    info!(source = %spec.label, count = records.len(), "Extracted candidate records");
    records
}
