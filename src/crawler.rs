//! Crawl orchestration across all configured feeds.
//!
//! Feeds are processed strictly one after another. A feed that fails as a
//! whole is logged and contributes no records; the snapshot is written in
//! every case, even when it ends up empty.

use crate::config::CrawlerConfig;
use crate::error::CrawlError;
use crate::extractors::ExtractorChain;
use crate::feeds::FeedProcessor;
use crate::fetch::Fetch;
use crate::images::ImageMirror;
use crate::models::ArticleRecord;
use crate::outputs::json::{snapshot_path, write_snapshot};
use crate::utils::ensure_writable_dir;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument};

pub struct Crawler {
    processor: FeedProcessor,
    output_dir: PathBuf,
    image_dir: PathBuf,
    max_entries: usize,
}

impl Crawler {
    /// Crawler with the standard extraction chain (readability, then metadata).
    pub fn new(config: &CrawlerConfig, fetcher: Arc<dyn Fetch>) -> Self {
        let chain = ExtractorChain::standard(Arc::clone(&fetcher));
        Self::with_chain(config, fetcher, chain)
    }

    pub fn with_chain(
        config: &CrawlerConfig,
        fetcher: Arc<dyn Fetch>,
        chain: ExtractorChain,
    ) -> Self {
        let image_dir = config.images_dir();
        let mirror = ImageMirror::new(Arc::clone(&fetcher), image_dir.clone());
        Self {
            processor: FeedProcessor::new(fetcher, chain, mirror, config.delay()),
            output_dir: config.output_dir.clone(),
            image_dir,
            max_entries: config.max_entries,
        }
    }

    /// Crawl every feed in order and write one snapshot.
    ///
    /// Returns the path of the snapshot: `output_file` when given, else a
    /// timestamped file in the output directory.
    ///
    /// # Errors
    ///
    /// Only when the output directories cannot be prepared or the snapshot
    /// cannot be written. Feed failures are logged and skipped.
    #[instrument(level = "info", skip_all, fields(feeds = feeds.len()))]
    pub async fn crawl_all(
        &self,
        feeds: &[String],
        output_file: Option<&Path>,
    ) -> Result<PathBuf, CrawlError> {
        for dir in [&self.output_dir, &self.image_dir] {
            ensure_writable_dir(dir)
                .await
                .map_err(|source| CrawlError::OutputDir {
                    path: dir.display().to_string(),
                    source,
                })?;
        }

        let mut records: Vec<ArticleRecord> = Vec::new();
        let mut failed_feeds = 0usize;
        for feed in feeds {
            match self.processor.process_feed(feed, self.max_entries).await {
                Ok(feed_records) => {
                    info!(%feed, count = feed_records.len(), "Feed processed");
                    records.extend(feed_records);
                }
                Err(e) => {
                    failed_feeds += 1;
                    error!(%feed, error = %e, "Feed failed; skipping");
                }
            }
        }

        let path = snapshot_path(&self.output_dir, output_file, Utc::now().timestamp());
        write_snapshot(&records, &path).await?;
        info!(
            count = records.len(),
            failed_feeds,
            path = %path.display(),
            "Saved articles"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use crate::extractors::readability::tests::article_html;
    use crate::extractors::{Extractor, MetadataExtractor, Page};
    use crate::fetch::testing::StaticFetcher;
    use crate::models::ArticleDraft;
    use futures::future::BoxFuture;
    use reqwest::StatusCode;
    use serde_json::Value;
    use tempfile::{TempDir, tempdir};

    struct NoReadability;

    impl Extractor for NoReadability {
        fn name(&self) -> &'static str {
            "no-readability"
        }

        fn extract<'a>(
            &'a self,
            _page: &'a Page,
        ) -> BoxFuture<'a, Result<ArticleDraft, ExtractError>> {
            Box::pin(async { Err(ExtractError::Readability("no article content".to_string())) })
        }
    }

    /// Config writing under a fresh temp dir; the output directory itself
    /// does not exist yet. Keep the `TempDir` alive for the whole test.
    fn config(feeds: &[&str]) -> (TempDir, CrawlerConfig) {
        let root = tempdir().unwrap();
        let config = CrawlerConfig {
            delay_secs: 0.0,
            output_dir: root.path().join("output"),
            feeds: feeds.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        };
        (root, config)
    }

    fn crawler(config: &CrawlerConfig, fetcher: Arc<StaticFetcher>) -> Crawler {
        let chain = ExtractorChain::new(vec![Box::new(NoReadability), Box::new(MetadataExtractor)]);
        Crawler::with_chain(config, fetcher, chain)
    }

    fn rss(title: &str, link: &str) -> String {
        format!(
            r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title>
            <link>https://example.com</link><description>d</description>
            <item><title>{title}</title><link>{link}</link><description>Feed summary</description>
            <pubDate>Tue, 06 May 2025 14:30:00 GMT</pubDate></item></channel></rss>"#
        )
    }

    fn read_snapshot(path: &Path) -> Vec<Value> {
        let raw = std::fs::read_to_string(path).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn keys(record: &Value) -> Vec<String> {
        let mut keys: Vec<String> = record.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[tokio::test]
    async fn test_two_feeds_end_to_end() {
        let feed1 = "https://one.example.com/rss";
        let feed2 = "https://two.example.com/rss";
        let fetcher = Arc::new(
            StaticFetcher::new()
                .with_body(feed1, rss("First", "https://one.example.com/a"))
                .with_status("https://one.example.com/a", StatusCode::NOT_FOUND)
                .with_body(feed2, rss("Second", "https://two.example.com/b"))
                .with_body(
                    "https://two.example.com/b",
                    r#"<html><head><meta property="og:title" content="Second, from page">
                       <meta property="og:image" content="/cover.jpg"></head></html>"#,
                )
                .with_body("https://two.example.com/cover.jpg", "jpeg"),
        );
        let (_root, config) = config(&[feed1, feed2]);
        let crawler = crawler(&config, fetcher);

        let path = crawler.crawl_all(&config.feeds, None).await.unwrap();

        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("noticias_") && file_name.ends_with(".json"));
        let records = read_snapshot(&path);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0]["feed"], feed1);
        assert_eq!(keys(&records[0]), ["feed", "link", "published", "summary", "title"]);
        assert_eq!(records[0]["title"], "First");
        assert_eq!(records[0]["summary"], "Feed summary");

        assert_eq!(records[1]["feed"], feed2);
        assert_eq!(
            keys(&records[1]),
            [
                "feed",
                "images",
                "link",
                "principal_image",
                "principal_image_local",
                "published",
                "summary",
                "title",
            ]
        );
        assert_eq!(records[1]["title"], "Second, from page");
        assert_eq!(records[1]["principal_image"], "https://two.example.com/cover.jpg");
        assert!(records[1]["summary"].is_null());
        let local = records[1]["principal_image_local"].as_str().unwrap();
        assert!(Path::new(local).starts_with(config.images_dir()));
    }

    #[tokio::test]
    async fn test_failing_feed_does_not_stop_later_feeds() {
        let broken = "https://broken.example.com/rss";
        let good = "https://good.example.com/rss";
        let fetcher = Arc::new(
            StaticFetcher::new()
                .with_body(broken, "definitely not xml")
                .with_body(good, rss("Good", "https://good.example.com/a")),
        );
        let (_root, config) = config(&[broken, "", good]);
        let crawler = crawler(&config, fetcher.clone());

        let path = crawler.crawl_all(&config.feeds, None).await.unwrap();

        let records = read_snapshot(&path);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["feed"], good);
        assert_eq!(fetcher.call_count("https://good.example.com/a"), 1);
    }

    #[tokio::test]
    async fn test_no_records_still_writes_fixed_file() {
        let (_root, config) = config(&[]);
        let fixed = config.output_dir.join("fixed.json");
        let crawler = crawler(&config, Arc::new(StaticFetcher::new()));

        let path = crawler.crawl_all(&config.feeds, Some(&fixed)).await.unwrap();

        assert_eq!(path, fixed);
        assert!(read_snapshot(&path).is_empty());
        assert!(config.images_dir().is_dir());
    }

    #[tokio::test]
    async fn test_all_feeds_unreachable_gives_empty_snapshot() {
        let (_root, config) = config(&["https://down.example.com/rss"]);
        let crawler = crawler(&config, Arc::new(StaticFetcher::new()));

        let path = crawler.crawl_all(&config.feeds, None).await.unwrap();

        assert!(read_snapshot(&path).is_empty());
    }

    #[tokio::test]
    async fn test_standard_chain_uses_readability_for_article_pages() {
        let feed = "https://news.example.com/rss";
        let article = "https://news.example.com/tech/rust-ships";
        let fetcher = Arc::new(
            StaticFetcher::new()
                .with_body(feed, rss("Rust ships", article))
                .with_body(article, article_html())
                .with_body("https://cdn.example.com/lead.jpg", "jpeg"),
        );
        let (_root, config) = config(&[feed]);
        let crawler = Crawler::new(&config, fetcher.clone());

        let path = crawler.crawl_all(&config.feeds, None).await.unwrap();

        let records = read_snapshot(&path);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "Rust edition ships today");
        assert!(records[0]["body"].as_str().unwrap().contains("Paragraph 0."));
        assert_eq!(records[0]["summary"], "A new edition of the language is out.");
        assert_eq!(records[0]["principal_image"], "https://cdn.example.com/lead.jpg");
        assert_eq!(
            records[0]["images"],
            serde_json::json!([
                "https://cdn.example.com/lead.jpg",
                "https://news.example.com/media/diagram.png",
            ])
        );
        // once by the feed processor, once more by the readability tier
        assert_eq!(fetcher.call_count(article), 2);
    }

    #[tokio::test]
    async fn test_standard_chain_falls_back_to_metadata() {
        let feed = "https://news.example.com/rss";
        let article = "https://news.example.com/short";
        let fetcher = Arc::new(
            StaticFetcher::new()
                .with_body(feed, rss("From feed", article))
                .with_body(
                    article,
                    r#"<html><head><title>Short | Example</title>
                       <meta property="og:title" content="Short note">
                       <meta name="description" content="Only a note.">
                       </head><body></body></html>"#,
                ),
        );
        let (_root, config) = config(&[feed]);
        let crawler = Crawler::new(&config, fetcher.clone());

        let path = crawler.crawl_all(&config.feeds, None).await.unwrap();

        let records = read_snapshot(&path);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "Short note");
        assert_eq!(records[0]["summary"], "Only a note.");
        assert!(records[0].get("body").is_none());
        assert_eq!(fetcher.call_count(article), 2);
    }
}
