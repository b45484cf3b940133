//! Feed parsing and per-feed article processing.
//!
//! [`parse_feed`] turns RSS, Atom or JSON Feed bytes into [`FeedEntry`]
//! values with `feed-rs`. [`FeedProcessor`] walks the entries of one feed
//! and, for each, fetches the article, runs the extraction chain and
//! mirrors the principal image. Per-entry failures degrade the record, they
//! never stop the feed.

use crate::error::FeedError;
use crate::extractors::{ExtractorChain, Page};
use crate::fetch::Fetch;
use crate::images::ImageMirror;
use crate::models::{ArticleRecord, FeedEntry};
use feed_rs::model::Link;
use feed_rs::parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Parse a feed document into entries, in feed order.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let feed = parser::parse(bytes)?;
    let entries = feed
        .entries
        .into_iter()
        .map(|entry| FeedEntry {
            title: entry.title.map(|t| t.content.trim().to_string()),
            link: article_link(&entry.links),
            published: entry.published.map(|p| p.to_rfc3339()),
            summary: entry.summary.map(|s| s.content),
        })
        .collect();
    Ok(entries)
}

/// Article URL of an entry: the first `alternate` link (or one without a
/// `rel`), else the first link of any kind. Atom feeds often list `replies`,
/// `edit` or `self` links ahead of the article.
fn article_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| {
            l.rel
                .as_deref()
                .is_none_or(|rel| rel.eq_ignore_ascii_case("alternate"))
        })
        .or_else(|| links.first())
        .map(|l| l.href.clone())
}

/// Turns the entries of one feed into article records.
pub struct FeedProcessor {
    fetcher: Arc<dyn Fetch>,
    chain: ExtractorChain,
    mirror: ImageMirror,
    delay: Duration,
}

impl FeedProcessor {
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        chain: ExtractorChain,
        mirror: ImageMirror,
        delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            chain,
            mirror,
            delay,
        }
    }

    /// Download and parse `feed_url`, then process at most `max_entries`
    /// entries in feed order. A blank URL yields no entries.
    ///
    /// # Errors
    ///
    /// Only when the feed itself cannot be downloaded or parsed.
    #[instrument(level = "info", skip(self), fields(feed = %feed_url))]
    pub async fn process_feed(
        &self,
        feed_url: &str,
        max_entries: usize,
    ) -> Result<Vec<ArticleRecord>, FeedError> {
        if feed_url.trim().is_empty() {
            debug!("Blank feed URL; nothing to process");
            return Ok(Vec::new());
        }

        info!("Processing feed");
        let bytes = self.fetcher.fetch(feed_url).await?;
        let entries = parse_feed(&bytes)?;
        info!(entries = entries.len(), max_entries, "Parsed feed");

        let mut records = Vec::new();
        for entry in entries.iter().take(max_entries) {
            records.push(self.process_entry(feed_url, entry).await);
        }
        Ok(records)
    }

    /// Build the record for one entry. Always returns a record; anything
    /// that fails leaves the corresponding fields unset.
    async fn process_entry(&self, feed_url: &str, entry: &FeedEntry) -> ArticleRecord {
        let mut record = ArticleRecord::from_entry(feed_url, entry);

        sleep(self.delay).await;

        let Some(link) = entry.link.as_deref() else {
            warn!(
                feed = %feed_url,
                title = ?entry.title,
                "Entry has no link; keeping feed metadata"
            );
            return record;
        };

        let html = match self.fetcher.fetch_text(link).await {
            Ok(html) if !html.trim().is_empty() => html,
            Ok(_) => {
                warn!(url = %link, "Article page is empty; keeping feed metadata");
                return record;
            }
            Err(e) => {
                warn!(url = %link, error = %e, "Article fetch failed; keeping feed metadata");
                return record;
            }
        };

        let page = Page {
            url: link.to_string(),
            html,
        };
        let Some(extraction) = self.chain.run(&page).await else {
            warn!(url = %link, "No extractor produced a draft");
            return record;
        };
        debug!(url = %link, extractor = extraction.extractor, "Merging extracted draft");
        record.merge_draft(extraction.draft);

        if let Some(image_url) = record.principal_image.as_deref() {
            match self.mirror.mirror(image_url).await {
                Ok(path) => record.principal_image_local = Some(path.display().to_string()),
                Err(e) => warn!(url = %image_url, error = %e, "Image mirror failed"),
            }
        }

        record
    }
}
