//! Export of search results to flat files.
//!
//! # Submodules
//!
//! - [`json`]: results wrapped with a `metadata` block (timestamp, count)
//! - [`csv`]: one row per record, base columns first then extra keys sorted
//!
//! Each format has a `write_*` function that returns [`ExportError`] and a
//! `save_*` wrapper that logs the error and reports success as a `bool`.
//! Documents are rendered fully in memory and written in a single call.

pub mod csv;
pub mod json;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] ::csv::Error),
}
