//! Typed errors for each stage of the crawl.
//!
//! Leaf components (fetcher, extractors, image mirror, feed parser) return
//! these errors; the feed processor and the crawler decide whether to log
//! and degrade or to stop.

use reqwest::StatusCode;
use thiserror::Error;

/// A single HTTP GET that produced no usable body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure, timeout, or an unparseable URL.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
}

/// Failure of an extraction tier.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("fetch inside extractor failed: {0}")]
    Fetch(#[from] FetchError),

    /// Readability could not find article content in the page.
    #[error("readability failed: {0}")]
    Readability(String),
}

/// Failure while mirroring an image to local storage.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("image download failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("image write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure that prevents a whole feed from producing entries.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed download failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("feed parse failed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// Errors that stop the crawler from producing a snapshot.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("output directory {path} is not usable: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration that could not be loaded or is out of range.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
