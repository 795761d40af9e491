//! Utility functions for string shaping and file system checks.
//!
//! Title truncation and filename slugs operate on code points, not bytes:
//! most titles in this pipeline are Japanese, so byte slicing would panic in
//! the middle of a multibyte character.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string to at most `max` code points.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_chars("hello", 10), "hello");
/// assert_eq!(truncate_chars("ベイスターズ", 3), "ベイス");
/// ```
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Convert a title into a filesystem-safe slug.
///
/// Lowercases, strips everything except word characters, whitespace, and
/// hyphens, collapses whitespace runs into single hyphens, and keeps the
/// first 50 code points.
pub fn sanitize_filename(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    let hyphenated = SPACES.replace_all(&stripped, "-");
    truncate_chars(&hyphenated, 50)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if missing, then probe-writes a temporary file. An
/// unwritable output directory is the one failure this pipeline treats as
/// fatal, so this runs before any network work.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
