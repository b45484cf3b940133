//! Data models for feed entries, extraction drafts and output records.
//!
//! - [`FeedEntry`]: one item parsed from a syndication feed
//! - [`ArticleDraft`]: what an extraction tier recovered from an article page
//! - [`ArticleRecord`]: the unit written to the snapshot

use serde::{Deserialize, Serialize};

/// One item from a parsed feed. Read-only after parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: Option<String>,
    /// Canonical article URL.
    pub link: Option<String>,
    /// Publication time, RFC 3339.
    pub published: Option<String>,
    pub summary: Option<String>,
}

/// An extracted article before it is merged into a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleDraft {
    pub title: String,
    /// Full body text. Only the readability tier produces one.
    pub body: Option<String>,
    pub summary: Option<String>,
    pub principal_image: Option<String>,
    /// Absolute image URLs, ordered and deduplicated.
    pub images: Vec<String>,
}

/// A single article in the snapshot.
///
/// Fields filled by extraction are omitted from the JSON when the article
/// page could not be fetched or extracted. `principal_image_local` is only
/// set when `principal_image` is set and the image was mirrored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// The feed this entry came from.
    pub feed: String,
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_image_local: Option<String>,
}

impl ArticleRecord {
    /// Base record carrying only the feed metadata of `entry`.
    pub fn from_entry(feed: &str, entry: &FeedEntry) -> Self {
        Self {
            feed: feed.to_string(),
            title: entry.title.clone(),
            link: entry.link.clone(),
            published: entry.published.clone(),
            summary: entry.summary.clone(),
            body: None,
            images: None,
            principal_image: None,
            principal_image_local: None,
        }
    }

    /// Overlay an extracted draft. Title, summary and images come entirely
    /// from the draft; the feed metadata for those fields is discarded.
    pub fn merge_draft(&mut self, draft: ArticleDraft) {
        self.title = Some(draft.title);
        self.summary = draft.summary;
        if draft.body.is_some() {
            self.body = draft.body;
        }
        self.principal_image = draft.principal_image;
        self.images = Some(draft.images);
        self.principal_image_local = None;
    }
}
