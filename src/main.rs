//! # Feed Snapshot
//!
//! Crawls a fixed list of syndication feeds, follows every entry to its
//! article, extracts a normalized record (title, body, summary, images)
//! and writes the whole run as one JSON snapshot.
//!
//! ## Usage
//!
//! ```sh
//! feed_snapshot -o ./output -f https://example.com/rss
//! ```
//!
//! ## Architecture
//!
//! The run is a single sequential pipeline:
//! 1. **Feeds**: Download and parse each feed, take the first entries
//! 2. **Fetching**: Download each article page after a fixed politeness delay
//! 3. **Extraction**: Readability first, page metadata as fallback
//! 4. **Images**: Mirror the principal image of each article locally
//! 5. **Output**: Write all records, in feed order, to one JSON file

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod crawler;
mod error;
mod extractors;
mod feeds;
mod fetch;
mod images;
mod models;
mod outputs;
mod utils;

use cli::Cli;
use config::CrawlerConfig;
use crawler::Crawler;
use fetch::HttpFetcher;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("feed_snapshot starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = CrawlerConfig::from_cli(&args)?;
    info!(
        feeds = config.feeds.len(),
        max_entries = config.max_entries,
        delay_secs = config.delay_secs,
        timeout_secs = config.timeout_secs,
        output_dir = %config.output_dir.display(),
        "Configuration ready"
    );

    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let crawler = Crawler::new(&config, fetcher);
    let path = crawler
        .crawl_all(&config.feeds, args.output_file.as_deref())
        .await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        path = %path.display(),
        "Done"
    );

    Ok(())
}
