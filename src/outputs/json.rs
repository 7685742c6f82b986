//! JSON export.
//!
//! # Output Structure
//!
//! ```text
//! {
//!   "metadata": { "timestamp": "2025-05-06T20:30:00.123456+08:00", "count": 2 },
//!   "results": [ { "title": ..., "url": ..., "summary": ..., "source": ..., "time": ... } ]
//! }
//! ```
//!
//! Output is pretty-printed and keeps non-ASCII text unescaped.

use crate::models::NewsRecord;
use crate::outputs::ExportError;
use crate::utils::{ensure_parent_dir, write_atomic};
use chrono::Local;
use serde::Serialize;
use std::path::Path;
use tracing::{error, info, instrument};

#[derive(Debug, Serialize)]
pub struct ExportMetadata {
    /// Local time of the export, ISO-8601.
    pub timestamp: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub metadata: ExportMetadata,
    pub results: &'a [NewsRecord],
}

impl<'a> ExportDocument<'a> {
    pub fn new(results: &'a [NewsRecord]) -> Self {
        Self {
            metadata: ExportMetadata {
                timestamp: Local::now().to_rfc3339(),
                count: results.len(),
            },
            results,
        }
    }
}

/// Render the export document.
pub fn to_json(records: &[NewsRecord]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&ExportDocument::new(records))?)
}

/// Write `records` to `path`, creating parent directories as needed.
///
/// The file is replaced in one step, so an interrupted run never leaves a
/// truncated export behind.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = records.len()))]
pub async fn write_json(records: &[NewsRecord], path: &Path) -> Result<(), ExportError> {
    let json = to_json(records)?;
    ensure_parent_dir(path).await?;
    write_atomic(path, json).await?;
    info!("Wrote JSON export");
    Ok(())
}

/// [`write_json`] with the error logged instead of returned.
pub async fn save_json(records: &[NewsRecord], path: &Path) -> bool {
    match write_json(records, path).await {
        Ok(()) => true,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to save JSON");
            false
        }
    }
}
