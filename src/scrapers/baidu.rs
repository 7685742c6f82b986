//! Baidu News search pipeline.
//!
//! [`NewsSearcher::search`] runs one page through query building, fetching
//! and extraction. [`NewsSearcher::search_pages`] is the caller-side loop
//! over several pages with a politeness delay between requests.

use crate::models::NewsRecord;
use crate::scrapers::extractor::extract;
use crate::scrapers::fetcher::{FetchError, Fetcher, HttpTransport, Transport};
use crate::scrapers::query::SearchRequest;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument};

/// Search pipeline owning a reusable fetcher.
#[derive(Debug)]
pub struct NewsSearcher<T = HttpTransport> {
    fetcher: Fetcher<T>,
}

impl<T: Transport> NewsSearcher<T> {
    pub fn new(fetcher: Fetcher<T>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    /// Fetch and extract a single result page.
    ///
    /// # Errors
    ///
    /// Returns the fetcher's [`FetchError`] once its retries are exhausted.
    #[instrument(level = "info", skip(self))]
    pub async fn search(&mut self, keywords: &str, page: u32) -> Result<Vec<NewsRecord>, FetchError> {
        let request = SearchRequest::new(keywords, page);
        let url = request.url();
        info!(page = request.page, offset = request.offset(), %url, "Searching");

        let html = self.fetcher.fetch(&url).await?;
        let records = extract(&html);
        info!(page = request.page, count = records.len(), "Page searched");
        Ok(records)
    }

    /// Search pages `1..=pages` in order, sleeping `delay` between pages.
    ///
    /// A page that fails to fetch is logged and ends the loop; everything
    /// collected before it is returned.
    #[instrument(level = "info", skip(self))]
    pub async fn search_pages(&mut self, keywords: &str, pages: u32, delay: Duration) -> Vec<NewsRecord> {
        let mut collected = Vec::new();

        for page in 1..=pages {
            match self.search(keywords, page).await {
                Ok(records) => collected.extend(records),
                Err(e) => {
                    error!(page, error = %e, "Search failed; stopping pagination");
                    break;
                }
            }
            if page < pages {
                sleep(delay).await;
            }
        }

        info!(count = collected.len(), pages, "Search complete");
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::fetcher::tests::ScriptedTransport;

    const PAGE: &str = r#"
        <div class="result"><h3><a href="/a">第一条</a></h3><div class="c-summary">1小时前，内容一</div></div>
        <div class="result"><h3><a href="/b">第二条</a></h3><div class="c-summary">内容二...环球网</div></div>
    "#;

    fn searcher(failures: usize, retries: usize) -> NewsSearcher<ScriptedTransport> {
        NewsSearcher::new(Fetcher::new(ScriptedTransport::new(failures, PAGE), retries))
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_single_page() {
        let mut searcher = searcher(0, 3);
        let records = searcher.search("新闻", 1).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "第一条");
        assert_eq!(records[0].time, "1小时前");
        assert_eq!(records[1].source, "环球网");
        assert_eq!(records[1].summary, "内容二");
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_propagates_fetch_error() {
        let mut searcher = searcher(usize::MAX, 2);
        let err = searcher.search("新闻", 1).await.unwrap_err();
        assert!(matches!(err, FetchError::RetriesExhausted { attempts: 2, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_pages_concatenates_in_order() {
        let mut searcher = searcher(0, 3);
        let started = tokio::time::Instant::now();

        let records = searcher.search_pages("新闻", 3, Duration::from_secs(1)).await;

        assert_eq!(records.len(), 6);
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["第一条", "第二条", "第一条", "第二条", "第一条", "第二条"]);
        // Two gaps between three pages, none after the last.
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_pages_stops_on_failure() {
        let mut searcher = searcher(usize::MAX, 1);
        let records = searcher.search_pages("新闻", 5, Duration::from_secs(1)).await;
        assert!(records.is_empty());
        assert_eq!(searcher.fetcher().max_retries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_pages_zero_pages() {
        let mut searcher = searcher(0, 1);
        assert!(searcher.search_pages("新闻", 0, Duration::from_secs(1)).await.is_empty());
    }
}
