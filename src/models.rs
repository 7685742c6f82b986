//! Data models for search results.
//!
//! - [`NewsRecord`]: one search hit extracted from a Baidu News result page
//!
//! Records produced by the extractor only carry the five base fields. Callers
//! may attach additional string fields through [`NewsRecord::extra`]; these
//! serialize flattened next to the base fields and show up as extra CSV
//! columns on export.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column names every export starts with, in this order.
pub const BASE_FIELDS: [&str; 5] = ["title", "url", "summary", "source", "time"];

/// A single news search result.
///
/// # Fields
///
/// * `title` - Headline text of the result
/// * `url` - Absolute link to the article (may be empty when the page had none)
/// * `summary` - Snippet text with any leading time marker and trailing outlet removed
/// * `source` - Publishing outlet, empty when it could not be determined
/// * `time` - Free-form publication marker such as `3小时前` or `6月1日`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsRecord {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub source: String,
    pub time: String,
    /// Caller-supplied fields beyond the base five.
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl NewsRecord {
    /// Look up a column by name, covering both base and extra fields.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "url" => Some(&self.url),
            "summary" => Some(&self.summary),
            "source" => Some(&self.source),
            "time" => Some(&self.time),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Attach an extra field, returning the record for chaining.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}
