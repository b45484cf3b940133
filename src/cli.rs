//! Command-line interface definitions for the feed crawler.
//!
//! Every option is optional: values not given on the command line come from
//! the YAML file passed with `--config`, or from the built-in defaults.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the crawler.
///
/// # Examples
///
/// ```sh
/// # Crawl the built-in feed list into ./output
/// feed_snapshot
///
/// # Crawl two feeds, three entries each, into a fixed file
/// feed_snapshot -f https://example.com/rss -f https://example.org/atom.xml \
///     -n 3 --output-file ./latest.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Feed URL to crawl (repeatable; replaces the configured feed list)
    #[arg(short, long = "feed")]
    pub feeds: Vec<String>,

    /// Directory that receives the snapshot file
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Directory that receives mirrored images (defaults to <output-dir>/images)
    #[arg(long)]
    pub image_dir: Option<PathBuf>,

    /// Maximum number of entries taken from each feed
    #[arg(short = 'n', long)]
    pub max_entries: Option<usize>,

    /// Seconds to wait before every article fetch
    #[arg(long)]
    pub delay_secs: Option<f64>,

    /// HTTP timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long, env = "CRAWLER_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Fixed snapshot filename (defaults to noticias_<timestamp>.json in the output dir)
    #[arg(long)]
    pub output_file: Option<PathBuf>,
}
