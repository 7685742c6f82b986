//! Text-returning search operations for assistant integrations.
//!
//! Three tools wrap the same pipeline and differ only in presentation:
//!
//! | Tool | Output |
//! |------|--------|
//! | [`search_news`] | JSON array, or a JSON error object |
//! | [`get_news_details`] | Markdown listing |
//! | [`search_news_by_topic`] | Markdown listing for a predefined topic |
//!
//! Every tool returns a `String` and never an error, so the caller can hand
//! the result straight back to the assistant.

use crate::models::NewsRecord;
use crate::scrapers::{NewsSearcher, Transport};
use serde_json::json;
use tracing::{instrument, warn};

/// Topic name to search keywords.
pub const TOPIC_KEYWORDS: [(&str, &str); 10] = [
    ("科技", "科技 新闻"),
    ("体育", "体育 新闻"),
    ("财经", "财经 新闻"),
    ("娱乐", "娱乐 新闻"),
    ("教育", "教育 新闻"),
    ("健康", "健康 医疗 新闻"),
    ("军事", "军事 新闻"),
    ("社会", "社会 新闻"),
    ("国际", "国际 新闻"),
    ("国内", "国内 新闻"),
];

/// Keywords for `topic`; unknown topics search for `"{topic} 新闻"`.
pub fn topic_keywords(topic: &str) -> String {
    TOPIC_KEYWORDS
        .iter()
        .find(|(name, _)| *name == topic)
        .map(|(_, keywords)| keywords.to_string())
        .unwrap_or_else(|| format!("{topic} 新闻"))
}

/// Pretty JSON array of `records`.
pub fn render_json(records: &[NewsRecord]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|e| render_json_error(&e.to_string()))
}

fn render_json_error(message: &str) -> String {
    json!({ "error": true, "message": message }).to_string()
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() { "unknown" } else { value }
}

/// Markdown listing under `heading`.
pub fn render_markdown(heading: &str, records: &[NewsRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("## {heading}\n\n"));
    out.push_str(&format!("Found {} related news items:\n\n", records.len()));
    for (i, item) in records.iter().enumerate() {
        out.push_str(&format!("### {}. {}\n", i + 1, item.title));
        out.push_str(&format!("**Link**: {}\n", item.url));
        out.push_str(&format!("**Summary**: {}\n", item.summary));
        out.push_str(&format!(
            "**Source**: {} | **Time**: {}\n\n",
            or_unknown(&item.source),
            or_unknown(&item.time)
        ));
        out.push_str("---\n\n");
    }
    out
}

async fn search_limited<T: Transport>(
    searcher: &mut NewsSearcher<T>,
    keywords: &str,
    page: u32,
    num: usize,
) -> Result<Vec<NewsRecord>, String> {
    let mut records = searcher
        .search(keywords, page)
        .await
        .map_err(|e| e.to_string())?;
    records.truncate(num);
    Ok(records)
}

/// Search one page and return at most `num` records as JSON.
#[instrument(level = "info", skip(searcher))]
pub async fn search_news<T: Transport>(
    searcher: &mut NewsSearcher<T>,
    keywords: &str,
    page: u32,
    num: usize,
) -> String {
    match search_limited(searcher, keywords, page, num).await {
        Ok(records) => render_json(&records),
        Err(message) => {
            warn!(%message, "search_news failed");
            render_json_error(&format!("Error while searching news: {message}"))
        }
    }
}

/// Search one page and return a Markdown detail listing.
#[instrument(level = "info", skip(searcher))]
pub async fn get_news_details<T: Transport>(
    searcher: &mut NewsSearcher<T>,
    keywords: &str,
    page: u32,
    num: usize,
) -> String {
    match search_limited(searcher, keywords, page, num).await {
        Ok(records) if records.is_empty() => format!("No news found for '{keywords}'."),
        Ok(records) => render_markdown(&format!("Baidu News results: {keywords}"), &records),
        Err(message) => {
            warn!(%message, "get_news_details failed");
            format!("Error while fetching news details: {message}")
        }
    }
}

/// Search a predefined topic and return a Markdown detail listing.
#[instrument(level = "info", skip(searcher))]
pub async fn search_news_by_topic<T: Transport>(
    searcher: &mut NewsSearcher<T>,
    topic: &str,
    page: u32,
    num: usize,
) -> String {
    let keywords = topic_keywords(topic);
    match search_limited(searcher, &keywords, page, num).await {
        Ok(records) if records.is_empty() => format!("No news found for topic '{topic}'."),
        Ok(records) => render_markdown(&format!("{topic} news results"), &records),
        Err(message) => {
            warn!(%message, "search_news_by_topic failed");
            format!("Error while fetching {topic} news: {message}")
        }
    }
}
