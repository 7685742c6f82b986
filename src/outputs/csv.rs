//! CSV export.
//!
//! The header always starts with `title,url,summary,source,time`. Extra keys
//! found on any record follow in sorted order; records lacking one of them
//! get an empty cell. An empty result list still produces the base header.

use crate::models::{BASE_FIELDS, NewsRecord};
use crate::outputs::ExportError;
use crate::utils::{ensure_parent_dir, write_atomic};
use itertools::Itertools;
use std::path::Path;
use tracing::{error, info, instrument};

/// Column order for `records`.
pub fn columns(records: &[NewsRecord]) -> Vec<String> {
    let extra = records
        .iter()
        .flat_map(|r| r.extra.keys())
        .filter(|k| !BASE_FIELDS.contains(&k.as_str()))
        .unique()
        .sorted()
        .cloned();

    BASE_FIELDS.iter().map(|f| f.to_string()).chain(extra).collect()
}

/// Render `records` as CSV bytes.
pub fn to_csv(records: &[NewsRecord]) -> Result<Vec<u8>, ExportError> {
    let columns = columns(records);
    let mut writer = ::csv::Writer::from_writer(Vec::new());

    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|c| record.field(c).unwrap_or_default()))?;
    }

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// Write `records` to `path`, creating parent directories as needed.
///
/// The file is replaced in one step, so an interrupted run never leaves a
/// truncated export behind.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = records.len()))]
pub async fn write_csv(records: &[NewsRecord], path: &Path) -> Result<(), ExportError> {
    let bytes = to_csv(records)?;
    ensure_parent_dir(path).await?;
    write_atomic(path, bytes).await?;
    info!("Wrote CSV export");
    Ok(())
}

/// [`write_csv`] with the error logged instead of returned.
pub async fn save_csv(records: &[NewsRecord], path: &Path) -> bool {
    match write_csv(records, path).await {
        Ok(()) => true,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to save CSV");
            false
        }
    }
}
