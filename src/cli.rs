//! Command-line interface definitions for Baidu News search.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Fetch tuning options can also be provided through environment variables
//! or a YAML configuration file.

use crate::config::{ConfigError, SearchConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Export formats for `--save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SaveFormat {
    Json,
    Csv,
    Both,
}

impl SaveFormat {
    pub fn includes_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }

    pub fn includes_csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }
}

/// How results are printed to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Numbered listing with an interactive pager
    Pager,
    /// JSON array of records
    Json,
    /// Markdown detail listing
    Markdown,
}

/// Command-line arguments for the Baidu News searcher.
///
/// # Examples
///
/// ```sh
/// # Two pages of results, saved as both JSON and CSV
/// baidu_news 人工智能 -p 2 -s both -o ./out/ai
///
/// # Topic search rendered as Markdown
/// baidu_news --topic 科技 -f markdown
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search keywords (joined with spaces)
    #[arg(required_unless_present = "topic")]
    pub keywords: Vec<String>,

    /// Search a predefined topic (科技, 体育, 财经, ...) instead of keywords
    #[arg(short, long, conflicts_with = "keywords")]
    pub topic: Option<String>,

    /// Number of result pages to fetch
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Results shown per screen
    #[arg(short = 'n', long = "num", default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub num: u64,

    /// Save results as JSON, CSV or both
    #[arg(short, long, value_enum)]
    pub save: Option<SaveFormat>,

    /// Output file name without extension
    #[arg(short, long, default_value = "baidu_news_results")]
    pub output: String,

    /// Delay between page requests in seconds
    #[arg(short, long)]
    pub delay: Option<f64>,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "BAIDU_NEWS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "BAIDU_NEWS_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Attempts per page before giving up
    #[arg(long, env = "BAIDU_NEWS_MAX_RETRIES")]
    pub retries: Option<usize>,

    /// How results are printed
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pager)]
    pub format: OutputFormat,
}

impl Cli {
    /// The query string: joined keywords, or the mapped topic keywords.
    pub fn query(&self) -> String {
        match &self.topic {
            Some(topic) => crate::tools::topic_keywords(topic),
            None => self.keywords.join(" "),
        }
    }

    /// Apply flag overrides on top of `config` and re-validate.
    pub fn apply_overrides(&self, mut config: SearchConfig) -> Result<SearchConfig, ConfigError> {
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(retries) = self.retries {
            config.max_retries = retries;
        }
        if let Some(delay) = self.delay {
            config.delay_secs = delay;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn json_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.json", self.output))
    }

    pub fn csv_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.csv", self.output))
    }
}
