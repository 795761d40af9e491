//! Shared extraction routine over one source's response body.
//!
//! The routine scans candidate elements (anchors for HTML sources, `<item>`
//! elements for the RSS source), reads a link target and a display text for
//! each, and applies the source's inclusion filter. Surviving items become
//! [`CandidateRecord`]s with the title truncated to 150 code points, deduped
//! by trimmed title within the source, and capped at 10 in document order.

use crate::models::CandidateRecord;
use crate::scrapers::{SourceKind, SourceSpec};
use crate::utils::truncate_chars;
use chrono::Utc;
use itertools::Itertools;
use scraper::{Html, Selector};
use serde::Deserialize;
use tracing::warn;
use url::Url;

/// Maximum title length in code points.
pub const TITLE_MAX_CHARS: usize = 150;
/// Display text must be strictly longer than this many code points.
pub const TEXT_MIN_CHARS: usize = 5;
/// Display text must be strictly shorter than this many code points.
pub const TEXT_MAX_CHARS: usize = 200;
/// Maximum records one source contributes per run.
pub const PER_SOURCE_CAP: usize = 10;

/// Extract candidate records from one source's response body.
///
/// Anomalies (bad selector, malformed XML) are logged and yield an empty
/// result; extraction never fails the run.
pub fn extract(spec: &SourceSpec, body: &str) -> Vec<CandidateRecord> {
    let raw = match spec.kind {
        SourceKind::Html => extract_html(spec, body),
        SourceKind::Rss => extract_rss(spec, body),
    };

    raw.into_iter()
        .unique_by(|r| r.dedup_key().to_string())
        .take(PER_SOURCE_CAP)
        .collect()
}

/// The inclusion filter shared by all adapters, plus the per-source
/// substring tests.
fn passes_filter(spec: &SourceSpec, href: &str, text: &str) -> bool {
    if href.is_empty() || text.is_empty() {
        return false;
    }
    let len = text.chars().count();
    if len <= TEXT_MIN_CHARS || len >= TEXT_MAX_CHARS {
        return false;
    }
    if let Some(needle) = spec.link_must_contain {
        if !href.contains(needle) {
            return false;
        }
    }
    if let Some(needle) = spec.text_must_contain {
        if !text.contains(needle) {
            return false;
        }
    }
    if let Some(needle) = spec.text_must_not_contain {
        if text.contains(needle) {
            return false;
        }
    }
    true
}

/// Resolve a possibly-relative href against the source's base origin.
fn resolve_url(base_origin: &str, href: &str) -> Option<String> {
    let base = Url::parse(base_origin).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}

fn make_record(spec: &SourceSpec, href: &str, text: &str) -> Option<CandidateRecord> {
    let url = resolve_url(spec.base_origin, href)?;
    Some(CandidateRecord {
        title: truncate_chars(text, TITLE_MAX_CHARS),
        url,
        source: spec.label.to_string(),
        fetched_at: Utc::now(),
    })
}

fn extract_html(spec: &SourceSpec, body: &str) -> Vec<CandidateRecord> {
    let selector = match Selector::parse(spec.selector) {
        Ok(s) => s,
        Err(e) => {
            warn!(source = %spec.label, selector = %spec.selector, error = %e, "Invalid selector");
            return Vec::new();
        }
    };

    let document = Html::parse_document(body);
    let mut records = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let text = element.text().collect::<String>();
        let text = text.trim();
        if !passes_filter(spec, href, text) {
            continue;
        }
        if let Some(record) = make_record(spec, href, text) {
            records.push(record);
        }
    }
    records
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
}

fn extract_rss(spec: &SourceSpec, body: &str) -> Vec<CandidateRecord> {
    let rss: Rss = match quick_xml::de::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            warn!(source = %spec.label, error = %e, "Malformed feed");
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for item in &rss.channel.items {
        let text = item.title.as_deref().unwrap_or_default().trim();
        let href = item.link.as_deref().unwrap_or_default().trim();
        if !passes_filter(spec, href, text) {
            continue;
        }
        if let Some(record) = make_record(spec, href, text) {
            records.push(record);
        }
    }
    records
}
