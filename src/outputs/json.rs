//! JSON snapshot output.
//!
//! One run produces one file: a pretty-printed JSON array of
//! [`ArticleRecord`] values in feed-then-entry order.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── noticias_1746541800.json
//! ├── noticias_1746563400.json
//! └── images/
//!     └── https___cdn_example_com_lead_jpg.jpg
//! ```
//!
//! The file is written in place, not atomically; a crash mid-write can
//! leave a truncated snapshot behind.

use crate::error::CrawlError;
use crate::models::ArticleRecord;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Snapshot path: `fixed` when given, else `noticias_<timestamp>.json`
/// inside `output_dir`.
pub fn snapshot_path(output_dir: &Path, fixed: Option<&Path>, unix_timestamp: i64) -> PathBuf {
    match fixed {
        Some(path) => path.to_path_buf(),
        None => output_dir.join(format!("noticias_{unix_timestamp}.json")),
    }
}

/// Serialize `records` as an indented JSON array and write it to `path`.
///
/// Non-ASCII text is written as-is, not `\u`-escaped.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = records.len()))]
pub async fn write_snapshot(records: &[ArticleRecord], path: &Path) -> Result<(), CrawlError> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).await?;
    info!("Wrote snapshot");
    Ok(())
}
