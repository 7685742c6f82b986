//! # Baidu News
//!
//! Keyword search over Baidu News with structured results.
//!
//! ## Features
//!
//! - Builds paginated search URLs from free-text keywords
//! - Fetches result pages with a rotating browser identity, a timeout and
//!   linear backoff retry
//! - Extracts title, link, summary, source and time from unversioned markup
//!   through ordered fallback selectors
//! - Exports results as JSON or CSV
//! - Exposes text-returning tools for assistant integrations
//!
//! ## Architecture
//!
//! 1. **Query**: [`scrapers::query`] turns keywords and a page into a URL
//! 2. **Fetch**: [`scrapers::fetcher`] downloads the page
//! 3. **Extract**: [`scrapers::extractor`] turns markup into [`models::NewsRecord`]s
//! 4. **Output**: [`display`], [`outputs`] and [`tools`] present the records

pub mod cli;
pub mod config;
pub mod display;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod tools;
pub mod utils;
