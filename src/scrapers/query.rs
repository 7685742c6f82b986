//! Search URL construction for Baidu News.
//!
//! Baidu paginates with a zero-based `pn` offset in steps of ten results.

/// Results per page on the Baidu News search endpoint.
pub const PAGE_SIZE: u64 = 10;

const SEARCH_ENDPOINT: &str = "https://news.baidu.com/ns";
const FIXED_PARAMS: &str = "cl=2&ct=1&tn=news&rn=10&ie=utf-8&bt=0&et=0";

/// One page worth of search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keywords: String,
    pub page: u32,
}

impl SearchRequest {
    /// Create a request; pages below 1 are clamped to 1.
    pub fn new(keywords: impl Into<String>, page: u32) -> Self {
        Self {
            keywords: keywords.into(),
            page: page.max(1),
        }
    }

    /// Zero-based position of the first result on this page.
    pub fn offset(&self) -> u64 {
        (u64::from(self.page.max(1)) - 1) * PAGE_SIZE
    }

    /// Fully formed search URL for this page.
    pub fn url(&self) -> String {
        format!(
            "{}?word={}&pn={}&{}",
            SEARCH_ENDPOINT,
            urlencoding::encode(&self.keywords),
            self.offset(),
            FIXED_PARAMS
        )
    }
}

/// Build the search URL for `keywords` on `page`.
pub fn build_search_url(keywords: &str, page: u32) -> String {
    SearchRequest::new(keywords, page).url()
}
