//! Article extraction tiers and the chain that composes them.
//!
//! An [`Extractor`] turns a fetched article [`Page`] into an
//! [`ArticleDraft`]. The [`ExtractorChain`] tries its tiers in order and
//! keeps the first draft produced:
//!
//! | Tier | Module | Method | Notes |
//! |------|--------|--------|-------|
//! | 1 | [`readability`] | Readability boilerplate removal | Re-downloads the page itself |
//! | 2 | [`metadata`] | Open Graph / `<meta>` / `<img>` heuristics | Never fails |
//!
//! Tier failures are logged here; the extractors themselves only return
//! errors.

pub mod metadata;
pub mod readability;

use crate::error::ExtractError;
use crate::fetch::Fetch;
use crate::models::ArticleDraft;
use crate::utils::resolve_url;
use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

pub use metadata::MetadataExtractor;
pub use readability::ReadabilityExtractor;

static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img[src]").expect("static selector"));

/// An article page that was already downloaded.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub html: String,
}

/// One extraction strategy.
pub trait Extractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn extract<'a>(&'a self, page: &'a Page) -> BoxFuture<'a, Result<ArticleDraft, ExtractError>>;
}

/// A draft tagged with the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub extractor: &'static str,
    pub draft: ArticleDraft,
}

/// Ordered fallback over extraction tiers.
pub struct ExtractorChain {
    tiers: Vec<Box<dyn Extractor>>,
}

impl ExtractorChain {
    pub fn new(tiers: Vec<Box<dyn Extractor>>) -> Self {
        Self { tiers }
    }

    /// Readability first, page metadata as the terminal fallback.
    pub fn standard(fetcher: Arc<dyn Fetch>) -> Self {
        Self::new(vec![
            Box::new(ReadabilityExtractor::new(fetcher)),
            Box::new(MetadataExtractor),
        ])
    }

    /// Run the tiers in order and return the first successful draft.
    ///
    /// Later tiers are not invoked once one succeeds. Returns `None` only if
    /// every tier failed.
    pub async fn run(&self, page: &Page) -> Option<Extraction> {
        for tier in &self.tiers {
            match tier.extract(page).await {
                Ok(draft) => {
                    debug!(url = %page.url, extractor = tier.name(), "Extracted article");
                    return Some(Extraction {
                        extractor: tier.name(),
                        draft,
                    });
                }
                Err(e) => {
                    warn!(
                        url = %page.url,
                        extractor = tier.name(),
                        error = %e,
                        "Extraction tier failed"
                    );
                }
            }
        }
        None
    }
}

/// Every `<img src>` in document order, resolved against `base`.
pub(crate) fn page_images(document: &Html, base: Option<&Url>) -> Vec<String> {
    document
        .select(&IMG_SELECTOR)
        .filter_map(|img| img.value().attr("src"))
        .filter_map(|src| resolve_url(base, src))
        .collect()
}
