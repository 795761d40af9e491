//! Article composition from snapshot records.
//!
//! The generative step itself is external to this pipeline: anything that can
//! turn one candidate record into prose (or fail) plugs in through the
//! [`ComposeBackend`] trait. This module owns the sequential loop around it:
//! a fixed inter-call delay to respect the generator's request budget, a
//! fallback to the offline demo template when the backend fails, writing each
//! article as a Markdown file with YAML front matter, and collecting the
//! [`ArticleMetadata`] batch for the index accumulator.

use crate::models::{ArticleMetadata, CandidateRecord};
use crate::utils::{sanitize_filename, truncate_chars};
use chrono::Local;
use serde::Serialize;
use std::error::Error;
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// Fixed delay between backend calls.
const COMPOSE_DELAY: Duration = Duration::from_millis(500);

/// Anything that can turn one candidate record into article prose.
pub trait ComposeBackend {
    /// Compose Markdown body text for one record.
    async fn compose(&self, record: &CandidateRecord) -> Result<String, Box<dyn Error>>;
}

/// Offline backend rendering a fixed fan-oriented template.
///
/// Used both as the default backend and as the fallback when a real
/// generator fails on one record.
#[derive(Debug)]
pub struct DemoBackend;

impl ComposeBackend for DemoBackend {
    async fn compose(&self, record: &CandidateRecord) -> Result<String, Box<dyn Error>> {
        Ok(demo_article(record))
    }
}

fn demo_article(record: &CandidateRecord) -> String {
    format!(
        "## {title}\n\n\
         **ソース**: {source}  \n\
         **日付**: {date}\n\n\
         ### ニュース概要\n\n\
         このニュースは、ベイスターズに関する最新情報です。詳細については、以下のリンクをご確認ください。\n\n\
         [元の記事を読む]({url})\n\n\
         ### ベイスターズファンの視点\n\n\
         ベイスターズの活動に関する重要なニュースが報告されました。\
         チームの最新動向に注目しながら、今後の試合や選手の活躍を応援していきましょう。\n\n\
         #ベイスターズ #横浜DeNA #プロ野球",
        title = record.title,
        source = record.source,
        date = Local::now().date_naive(),
        url = record.url,
    )
}

/// YAML front matter prepended to every generated article.
#[derive(Debug, Serialize)]
struct FrontMatter<'a> {
    title: &'a str,
    date: String,
    category: &'static str,
    source: &'a str,
    #[serde(rename = "sourceUrl")]
    source_url: &'a str,
    author: &'static str,
}

fn render_article(record: &CandidateRecord, date: &str, body: &str) -> Result<String, Box<dyn Error>> {
    let front = FrontMatter {
        title: &record.title,
        date: date.to_string(),
        category: "ベイスターズニュース",
        source: &record.source,
        source_url: &record.url,
        author: "AI記事生成",
    };
    let yaml = serde_yaml::to_string(&front)?;
    Ok(format!("---\n{yaml}---\n\n{body}\n"))
}

/// Compose one article per record, sequentially, and return the metadata batch.
///
/// A backend failure on one record falls back to the demo template; only a
/// failure to write an article file is fatal.
#[instrument(level = "info", skip_all, fields(count = records.len(), %articles_dir))]
pub async fn compose_all<B: ComposeBackend>(
    backend: &B,
    records: &[CandidateRecord],
    articles_dir: &str,
) -> Result<Vec<ArticleMetadata>, Box<dyn Error>> {
    let date = Local::now().date_naive().to_string();
    let mut batch = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        info!(
            index = i + 1,
            total = records.len(),
            title = %truncate_chars(&record.title, 60),
            "Composing article"
        );

        let body = match backend.compose(record).await {
            Ok(text) => text,
            Err(e) => {
                warn!(index = i + 1, error = %e, "Backend failed; using demo template");
                demo_article(record)
            }
        };

        let filename = format!("{date}-{}-{}.md", i + 1, sanitize_filename(&record.title));
        let filepath = format!("{}/{filename}", articles_dir.trim_end_matches('/'));
        let markdown = render_article(record, &date, &body)?;
        fs::write(&filepath, markdown).await?;
        info!(%filename, "Wrote article");

        batch.push(ArticleMetadata {
            title: record.title.clone(),
            date: date.clone(),
            filename,
            filepath,
        });

        if i + 1 < records.len() {
            sleep(COMPOSE_DELAY).await;
        }
    }

    Ok(batch)
}
