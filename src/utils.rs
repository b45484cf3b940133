//! Utility functions for naming mirrored files and preparing directories.
//!
//! - Slug derivation for filesystem-safe names
//! - Image extension detection from URLs
//! - URL resolution against a page URL
//! - File system validation for output directories

use sha2::{Digest, Sha256};
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Maximum length of a slug, in characters.
pub const SLUG_MAX_CHARS: usize = 120;

/// Longest URL suffix (including the dot) accepted as an image extension.
const MAX_EXTENSION_CHARS: usize = 6;

const DEFAULT_IMAGE_EXTENSION: &str = ".jpg";

/// Derive a deterministic, filesystem-safe name from arbitrary text.
///
/// Every non-alphanumeric character becomes `_`, leading and trailing
/// underscores are stripped and the result is cut to [`SLUG_MAX_CHARS`].
/// Input with no alphanumerics at all falls back to the first 8 hex
/// characters of its SHA-256 digest, so the result is never empty.
///
/// Distinct inputs can produce the same slug; collisions are not detected.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slug("Hello, World!"), "Hello__World");
/// assert_eq!(slug("???").len(), 8);
/// ```
pub fn slug(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_matches('_');

    if trimmed.is_empty() {
        let digest = format!("{:x}", Sha256::digest(text.as_bytes()));
        return digest[..8].to_string();
    }
    trimmed.chars().take(SLUG_MAX_CHARS).collect()
}

/// File extension (with leading dot) for a mirrored image.
///
/// Taken from the last path segment of the URL, ignoring any query string.
/// Falls back to `.jpg` when the segment has no extension or the extension
/// is longer than six characters.
pub fn image_extension(image_url: &str) -> String {
    let path = match Url::parse(image_url) {
        Ok(url) => url.path().to_string(),
        Err(_) => image_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let file_name = path.rsplit('/').next().unwrap_or_default();
    // a leading dot marks a hidden file, not an extension
    let stem = file_name.trim_start_matches('.');
    match stem.rfind('.') {
        Some(idx) => {
            let ext = &stem[idx..];
            if ext.len() > 1 && ext.chars().count() <= MAX_EXTENSION_CHARS {
                ext.to_string()
            } else {
                DEFAULT_IMAGE_EXTENSION.to_string()
            }
        }
        None => DEFAULT_IMAGE_EXTENSION.to_string(),
    }
}

/// Resolve `href` against `base`; absolute `href` values pass through.
///
/// An empty `href` resolves to `base` itself (minus any fragment), the way
/// a browser treats `<img src="">`.
pub fn resolve_url(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    let resolved = match base {
        Some(base) => base.join(href),
        None => Url::parse(href),
    };
    resolved.ok().map(|u| u.to_string())
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory (and parents) if needed, then writes and removes a
/// probe file. Calling it on an existing writable directory is a no-op.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    fs::write(&probe_path, b"").await?;
    let _ = fs::remove_file(&probe_path).await;
    info!("Output directory is writable");
    Ok(())
}
