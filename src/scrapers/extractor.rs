//! Result extraction from Baidu News search pages.
//!
//! The markup is unversioned, so every lookup is a [`SelectorChain`]: an
//! ordered list of CSS strategies evaluated left to right where the first
//! strategy that produces something usable wins.
//!
//! # Block discovery
//!
//! 1. [`BLOCK_SELECTORS`], first selector with at least one match wins
//! 2. Otherwise every classed `div` whose class mentions one of
//!    [`BLOCK_CLASS_KEYWORDS`] (case-insensitive)
//!
//! # Fields
//!
//! Title, summary and source each have their own chain. The publication time
//! is not a selector at all: it is pattern-matched out of the head of the
//! summary. When no source element exists, a trailing outlet name after the
//! last `...` of the summary is used instead.

use crate::models::NewsRecord;
use crate::utils::{char_prefix, truncate_for_log};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub const SITE_ORIGIN: &str = "https://news.baidu.com";

pub const BLOCK_SELECTORS: [&str; 5] = [
    "div.result",
    "div.news-item",
    "div.c-container",
    r#"div[class*="result"]"#,
    r#"div[class*="news"]"#,
];
pub const BLOCK_CLASS_KEYWORDS: [&str; 4] = ["result", "news", "item", "container"];
pub const TITLE_SELECTORS: [&str; 4] = ["h3 a", "a.news-title", r#"a[class*="title"]"#, "a"];
pub const SUMMARY_SELECTORS: [&str; 5] = [
    "div.c-summary",
    "div.content",
    r#"div[class*="summary"]"#,
    r#"div[class*="content"]"#,
    "p",
];
pub const SOURCE_SELECTORS: [&str; 4] = [
    "div.c-author",
    "div.source",
    "span.source",
    r#"div[class*="source"]"#,
];

/// Fragments that mark a trailing summary piece as an outlet name.
pub const OUTLET_KEYWORDS: [&str; 7] = ["网", "报", "新闻", "日报", "周刊", "电视台", "通讯社"];

/// Only this many leading characters of a summary are searched for a time marker.
pub const TIME_SCAN_CHARS: usize = 50;

const ELLIPSIS: &str = "...";
const TIME_SEPARATORS: [char; 2] = ['，', ','];

// Full dates go before month/day, which would otherwise match inside them:
// `2023年6月1日` must not come out as `6月1日`.
const TIME_PATTERNS: [&str; 7] = [
    r"\d+分钟前",
    r"\d+小时前",
    r"\d+天前",
    r"今天",
    r"昨天",
    r"\d{4}年\d{1,2}月\d{1,2}日",
    r"\d{1,2}月\d{1,2}日",
];

pub static BLOCK_CHAIN: Lazy<SelectorChain> = Lazy::new(|| SelectorChain::new(&BLOCK_SELECTORS));
pub static TITLE_CHAIN: Lazy<SelectorChain> = Lazy::new(|| SelectorChain::new(&TITLE_SELECTORS));
pub static SUMMARY_CHAIN: Lazy<SelectorChain> =
    Lazy::new(|| SelectorChain::new(&SUMMARY_SELECTORS));
pub static SOURCE_CHAIN: Lazy<SelectorChain> =
    Lazy::new(|| SelectorChain::new(&SOURCE_SELECTORS));

static CLASSED_DIV: Lazy<Selector> = Lazy::new(|| Selector::parse("div[class]").unwrap());
static TIME_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    TIME_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

/// Why a candidate block produced no record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionSkip {
    #[error("block {index} has no element with title text")]
    MissingTitle { index: usize },
}

/// Priority-ordered CSS strategies.
#[derive(Debug)]
pub struct SelectorChain {
    strategies: Vec<(&'static str, Selector)>,
}

impl SelectorChain {
    /// Compile the given selectors; these are fixed strings so a bad one is a bug.
    pub fn new(css: &[&'static str]) -> Self {
        let strategies = css
            .iter()
            .map(|&s| (s, Selector::parse(s).unwrap()))
            .collect();
        Self { strategies }
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// All matches of the first strategy that matches anything in `document`.
    pub fn first_matching<'a>(&self, document: &'a Html) -> Option<(&'static str, Vec<ElementRef<'a>>)> {
        self.strategies.iter().find_map(|(css, selector)| {
            let hits: Vec<_> = document.select(selector).collect();
            (!hits.is_empty()).then_some((*css, hits))
        })
    }

    /// First strategy whose first match inside `scope` carries non-empty text.
    pub fn first_with_text<'a>(&self, scope: ElementRef<'a>) -> Option<(ElementRef<'a>, String)> {
        self.strategies.iter().find_map(|(_, selector)| {
            let element = scope.select(selector).next()?;
            let text = stripped_text(element);
            (!text.is_empty()).then_some((element, text))
        })
    }
}

/// Element text with each text node trimmed and the pieces concatenated.
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Locate candidate result blocks in document order.
pub fn find_blocks(document: &Html) -> Vec<ElementRef<'_>> {
    if let Some((selector, blocks)) = BLOCK_CHAIN.first_matching(document) {
        info!(count = blocks.len(), selector, "Found result blocks");
        return blocks;
    }

    let blocks: Vec<_> = document
        .select(&CLASSED_DIV)
        .filter(|element| {
            let class = element.value().attr("class").unwrap_or_default().to_lowercase();
            BLOCK_CLASS_KEYWORDS.iter().any(|k| class.contains(k))
        })
        .collect();
    info!(count = blocks.len(), "No block selector matched; using class keyword scan");
    blocks
}

/// Make a site-relative link absolute; anything else is kept verbatim.
pub fn absolutize(href: &str) -> String {
    if href.starts_with('/') {
        format!("{SITE_ORIGIN}{href}")
    } else {
        href.to_string()
    }
}

/// Pull a leading time marker out of `summary`.
///
/// Returns `(time, remaining_summary)`; `time` is empty when nothing in the
/// first [`TIME_SCAN_CHARS`] characters matches.
pub fn split_time(summary: &str) -> (String, String) {
    let window = char_prefix(summary, TIME_SCAN_CHARS);
    for regex in TIME_REGEXES.iter() {
        if let Some(found) = regex.find(window) {
            let before = summary[..found.start()].trim_end();
            let after = summary[found.end()..].trim_start();
            let after = after
                .strip_prefix(TIME_SEPARATORS)
                .unwrap_or(after)
                .trim_start();
            let rest = format!("{before}{after}");
            return (found.as_str().to_string(), rest.trim().to_string());
        }
    }
    (String::new(), summary.to_string())
}

/// Split a trailing outlet name off the last `...` of `summary`.
///
/// Returns `(remaining_summary, source)` when the trailing piece mentions an
/// outlet keyword.
pub fn split_trailing_source(summary: &str) -> Option<(String, String)> {
    let (head, tail) = summary.rsplit_once(ELLIPSIS)?;
    let candidate = tail.trim();
    if !OUTLET_KEYWORDS.iter().any(|k| candidate.contains(k)) {
        return None;
    }
    Some((head.trim().to_string(), candidate.to_string()))
}

/// Turn one block into a record.
pub fn extract_block(index: usize, block: ElementRef<'_>) -> Result<NewsRecord, ExtractionSkip> {
    let (title_element, title) = TITLE_CHAIN
        .first_with_text(block)
        .ok_or(ExtractionSkip::MissingTitle { index })?;
    let url = absolutize(title_element.value().attr("href").unwrap_or_default());

    let summary = SUMMARY_CHAIN
        .first_with_text(block)
        .map(|(_, text)| text)
        .unwrap_or_default();
    let (time, mut summary) = split_time(&summary);

    let mut source = SOURCE_CHAIN
        .first_with_text(block)
        .map(|(_, text)| text)
        .unwrap_or_default();
    if source.is_empty() && !summary.is_empty() {
        if let Some((rest, outlet)) = split_trailing_source(&summary) {
            summary = rest;
            source = outlet;
        }
    }

    Ok(NewsRecord {
        title,
        url,
        summary: summary.trim().to_string(),
        source,
        time,
        extra: BTreeMap::new(),
    })
}

/// Extract all records from a result page, in document order.
///
/// Never fails: unusable blocks are logged and skipped, and markup without
/// any recognisable block yields an empty list.
#[instrument(level = "info", skip_all, fields(bytes = html.len()))]
pub fn extract(html: &str) -> Vec<NewsRecord> {
    let document = Html::parse_document(html);
    let blocks = find_blocks(&document);

    let mut records = Vec::with_capacity(blocks.len());
    for (index, block) in blocks.into_iter().enumerate() {
        match extract_block(index, block) {
            Ok(record) => {
                debug!(title = %truncate_for_log(&record.title, 30), "Parsed news item");
                records.push(record);
            }
            Err(skip) => debug!(reason = %skip, "Skipping block"),
        }
    }

    if records.is_empty() {
        warn!("No news items extracted from page");
    } else {
        info!(count = records.len(), "Extracted news items");
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULT_PAGE: &str = r#"
        <html><body>
          <div id="content_left">
            <div class="result" id="1">
              <h3 class="c-title"><a href="/news/1">人工智能<em>新突破</em></a></h3>
              <div class="c-summary">3小时前，某某事件发生...新华网</div>
            </div>
            <div class="result" id="2">
              <h3 class="c-title"><a href="https://b.example/2">第二条新闻</a></h3>
              <p>2023年6月1日 内容摘要</p>
              <span class="source">人民日报</span>
            </div>
            <div class="result" id="3">
              <p>没有标题的条目</p>
            </div>
          </div>
        </body></html>
    "#;

    fn first_block(html: &str) -> NewsRecord {
        let document = Html::parse_document(html);
        let blocks = find_blocks(&document);
        extract_block(0, blocks[0]).unwrap()
    }

    #[test]
    fn test_static_chains_compile() {
        assert_eq!(BLOCK_CHAIN.len(), BLOCK_SELECTORS.len());
        assert_eq!(TITLE_CHAIN.len(), TITLE_SELECTORS.len());
        assert_eq!(SUMMARY_CHAIN.len(), SUMMARY_SELECTORS.len());
        assert_eq!(SOURCE_CHAIN.len(), SOURCE_SELECTORS.len());
        assert_eq!(TIME_REGEXES.len(), TIME_PATTERNS.len());
    }

    #[test]
    fn test_extract_result_page() {
        let records = extract(RESULT_PAGE);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].title, "人工智能新突破");
        assert_eq!(records[0].url, "https://news.baidu.com/news/1");
        assert_eq!(records[0].time, "3小时前");
        assert_eq!(records[0].source, "新华网");
        assert_eq!(records[0].summary, "某某事件发生");

        assert_eq!(records[1].title, "第二条新闻");
        assert_eq!(records[1].url, "https://b.example/2");
        assert_eq!(records[1].time, "2023年6月1日");
        assert_eq!(records[1].summary, "内容摘要");
        assert_eq!(records[1].source, "人民日报");
    }

    #[test]
    fn test_empty_and_garbage_markup() {
        for html in ["", "not html at all <<<>>>", "<html><body></body></html>", "\u{0}\u{1}%%%"] {
            assert!(extract(html).is_empty(), "input: {html:?}");
        }
    }

    #[test]
    fn test_title_only_block() {
        let record = first_block(r#"<div class="result"><h3><a href="/x">只有标题</a></h3></div>"#);
        assert_eq!(record.title, "只有标题");
        assert_eq!(record.url, "https://news.baidu.com/x");
        assert_eq!(record.summary, "");
        assert_eq!(record.source, "");
        assert_eq!(record.time, "");
    }

    #[test]
    fn test_block_without_title_is_dropped() {
        let html = r#"<div class="result"><div class="c-summary">只有摘要</div></div>"#;
        assert!(extract(html).is_empty());

        let document = Html::parse_document(html);
        let blocks = find_blocks(&document);
        assert_eq!(
            extract_block(7, blocks[0]),
            Err(ExtractionSkip::MissingTitle { index: 7 })
        );
    }

    #[test]
    fn test_title_falls_through_empty_anchor() {
        let record = first_block(
            r#"<div class="result"><h3><a href="/empty">  </a></h3><a class="news-title" href="http://b.example">真正的标题</a></div>"#,
        );
        assert_eq!(record.title, "真正的标题");
        assert_eq!(record.url, "http://b.example");
    }

    #[test]
    fn test_missing_href_gives_empty_url() {
        let record = first_block(r#"<div class="result"><h3><a>无链接</a></h3></div>"#);
        assert_eq!(record.url, "");
    }

    #[test]
    fn test_first_block_selector_wins() {
        let html = r#"
            <div class="news-item"><a href="/a">A</a></div>
            <div class="result"><a href="/b">B</a></div>
            <div class="news-item"><a href="/c">C</a></div>
        "#;
        let titles: Vec<_> = extract(html).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["B"]);
    }

    #[test]
    fn test_partial_class_selector() {
        let html = r#"<div class="c-result-wrap"><a href="/a">A</a></div>"#;
        let titles: Vec<_> = extract(html).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["A"]);
    }

    #[test]
    fn test_class_keyword_fallback_is_case_insensitive() {
        let html = r#"
            <div class="Item-Card"><a href="/one">一</a></div>
            <div class="plain"><a href="/two">二</a></div>
            <div class="Main-Container"><a href="/three">三</a></div>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(find_blocks(&document).len(), 2);

        let titles: Vec<_> = extract(html).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["一", "三"]);
    }

    #[test]
    fn test_split_time_relative() {
        let (time, summary) = split_time("3小时前，某某事件发生");
        assert_eq!(time, "3小时前");
        assert_eq!(summary, "某某事件发生");

        let (time, summary) = split_time("15分钟前 快讯");
        assert_eq!(time, "15分钟前");
        assert_eq!(summary, "快讯");

        let (time, summary) = split_time("2天前,旧闻");
        assert_eq!(time, "2天前");
        assert_eq!(summary, "旧闻");
    }

    #[test]
    fn test_split_time_literal_days() {
        assert_eq!(split_time("今天 发布会召开"), ("今天".to_string(), "发布会召开".to_string()));
        assert_eq!(split_time("昨天，股市收盘"), ("昨天".to_string(), "股市收盘".to_string()));
    }

    #[test]
    fn test_split_time_dates() {
        assert_eq!(
            split_time("2024年12月25日 圣诞节"),
            ("2024年12月25日".to_string(), "圣诞节".to_string())
        );
        assert_eq!(split_time("6月1日 儿童节"), ("6月1日".to_string(), "儿童节".to_string()));
    }

    #[test]
    fn test_split_time_removes_marker_in_place() {
        let (time, rest) = split_time("据报道 3小时前，事件发生");
        assert_eq!(time, "3小时前");
        assert_eq!(rest, "据报道事件发生");
    }

    #[test]
    fn test_split_time_only_scans_head() {
        let summary = format!("{}3小时前", "很".repeat(60));
        let (time, rest) = split_time(&summary);
        assert_eq!(time, "");
        assert_eq!(rest, summary);
    }

    #[test]
    fn test_split_time_without_marker() {
        assert_eq!(split_time("普通摘要"), (String::new(), "普通摘要".to_string()));
        assert_eq!(split_time(""), (String::new(), String::new()));
    }

    #[test]
    fn test_split_trailing_source() {
        assert_eq!(
            split_trailing_source("事件经过...后续报道...澎湃新闻"),
            Some(("事件经过...后续报道".to_string(), "澎湃新闻".to_string()))
        );
        assert_eq!(split_trailing_source("内容...更多"), None);
        assert_eq!(split_trailing_source("没有省略号的新华网"), None);
        assert_eq!(split_trailing_source("结尾是省略号..."), None);
    }

    #[test]
    fn test_source_element_beats_summary_tail() {
        let record = first_block(
            r#"<div class="result"><h3><a href="/a">标题</a></h3>
               <div class="c-summary">摘要内容...新华网</div>
               <div class="c-author">央视新闻</div></div>"#,
        );
        assert_eq!(record.source, "央视新闻");
        assert_eq!(record.summary, "摘要内容...新华网");
    }

    #[test]
    fn test_summary_chain_order() {
        let record = first_block(
            r#"<div class="result"><h3><a href="/a">标题</a></h3>
               <p>段落摘要</p>
               <div class="content">正文摘要</div></div>"#,
        );
        assert_eq!(record.summary, "正文摘要");
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(absolutize("/s?id=1"), "https://news.baidu.com/s?id=1");
        assert_eq!(absolutize("https://x.example/a"), "https://x.example/a");
        assert_eq!(absolutize("javascript:void(0)"), "javascript:void(0)");
        assert_eq!(absolutize(""), "");
    }
}
