//! Baidu News search-and-extract pipeline.
//!
//! The pipeline is split into leaf-first stages:
//!
//! | Stage | Module | Role |
//! |-------|--------|------|
//! | Query | [`query`] | Keywords + page number to search URL |
//! | Fetch | [`fetcher`] | GET with rotating identity, timeout and backoff retry |
//! | Extract | [`extractor`] | Result blocks to [`NewsRecord`](crate::models::NewsRecord)s |
//! | Pipeline | [`baidu`] | Composes the three and loops over pages |
//!
//! Extraction never fails; only fetching can, and a fetch failure ends the
//! search for that page.

pub mod baidu;
pub mod extractor;
pub mod fetcher;
pub mod query;

pub use baidu::NewsSearcher;
pub use fetcher::{FetchError, Fetcher, HttpTransport, Transport};
