//! Command-line interface definitions.
//!
//! The pipeline is designed to run parameterless on a schedule; the flags
//! here only relocate the output directory or stop the run after the
//! snapshot, mirroring the fetch and generate halves of the pipeline.

use clap::Parser;

/// Command-line arguments for the Baystars news pipeline.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Directory holding the raw snapshot, generated articles, and index
    #[arg(short, long, default_value = "articles")]
    pub articles_dir: String,

    /// Stop after writing the raw snapshot (skip article composition)
    #[arg(long)]
    pub fetch_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["baystars_news"]);
        assert_eq!(cli.articles_dir, "articles");
        assert!(!cli.fetch_only);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["baystars_news", "-a", "/tmp/articles", "--fetch-only"]);
        assert_eq!(cli.articles_dir, "/tmp/articles");
        assert!(cli.fetch_only);
    }
}
