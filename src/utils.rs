//! Utility functions for string handling and file system preparation.
//!
//! - Character-safe truncation for log output (titles are mostly CJK)
//! - Character-window slicing for the time-marker scan
//! - Parent directory creation before exports are written
//! - Whole-file replacement so an interrupted export never leaves a truncated file

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped characters appended. Counting is by `char`, so multi-byte text
/// is never split inside a code point.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("人工智能新闻", 2), "人工…(+4 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        format!("{}…(+{} chars)", char_prefix(s, max), total - max)
    }
}

/// The first `n` characters of `s` as a borrowed slice.
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Make sure the directory that will hold `path` exists.
///
/// A bare file name (no parent component) needs nothing.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            debug!(dir = %parent.display(), "Output directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Sibling path `contents` are staged in before being renamed onto `path`.
pub fn staging_path(path: &Path) -> io::Result<PathBuf> {
    let Some(name) = path.file_name() else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        ));
    };
    let mut staged = name.to_os_string();
    staged.push(".tmp");
    Ok(path.with_file_name(staged))
}

/// Write `contents` to `path` in one step: stage in a sibling file, then rename.
///
/// Readers see either the previous file or the complete new one. The staging
/// file is removed when the rename fails.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), bytes = contents.as_ref().len()))]
pub async fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
    let staged = staging_path(path)?;
    fs::write(&staged, contents.as_ref()).await?;
    if let Err(e) = fs::rename(&staged, path).await {
        fs::remove_file(&staged).await.ok();
        return Err(e);
    }
    debug!("Replaced file");
    Ok(())
}
