//! Primary extraction tier: Readability over a fresh download of the page.
//!
//! The tier downloads the article again instead of reusing the HTML the
//! feed processor already fetched, so it stays usable on its own from just
//! a URL. Boilerplate removal, title detection and the excerpt come from
//! `dom_smoothie`; the image set is every `<img>` on the page, led by the
//! Readability lead image.

use super::{Extractor, Page, page_images};
use crate::error::ExtractError;
use crate::fetch::Fetch;
use crate::models::ArticleDraft;
use crate::utils::resolve_url;
use dom_smoothie::{Config, Readability};
use futures::future::BoxFuture;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("static regex"));

pub struct ReadabilityExtractor {
    fetcher: Arc<dyn Fetch>,
}

impl ReadabilityExtractor {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self { fetcher }
    }
}

impl Extractor for ReadabilityExtractor {
    fn name(&self) -> &'static str {
        "readability"
    }

    fn extract<'a>(&'a self, page: &'a Page) -> BoxFuture<'a, Result<ArticleDraft, ExtractError>> {
        Box::pin(async move {
            let html = self.fetcher.fetch_text(&page.url).await?;
            parse_article(&page.url, &html)
        })
    }
}

/// Run Readability on `html` and build a draft.
///
/// # Errors
///
/// [`ExtractError::Readability`] when the document cannot be parsed or no
/// article content is found in it.
#[instrument(level = "debug", skip(html), fields(bytes = html.len()))]
pub fn parse_article(url: &str, html: &str) -> Result<ArticleDraft, ExtractError> {
    let cfg = Config {
        max_elements_to_parse: 9000,
        ..Default::default()
    };
    let mut readability = Readability::new(html, Some(url), Some(cfg))
        .map_err(|e| ExtractError::Readability(e.to_string()))?;
    let article = readability
        .parse()
        .map_err(|e| ExtractError::Readability(e.to_string()))?;

    let base = Url::parse(url).ok();
    let lead_image = article
        .image
        .as_deref()
        .filter(|src| !src.trim().is_empty())
        .and_then(|src| resolve_url(base.as_ref(), src));

    let document = Html::parse_document(html);
    let images: Vec<String> = lead_image
        .clone()
        .into_iter()
        .chain(page_images(&document, base.as_ref()))
        .unique()
        .collect();
    let principal_image = lead_image.or_else(|| images.first().cloned());

    let body = normalize_body(&article.text_content);
    let summary = article
        .excerpt
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    debug!(
        title = %article.title,
        body_chars = body.len(),
        images = images.len(),
        "Readability parsed article"
    );

    Ok(ArticleDraft {
        title: article.title.trim().to_string(),
        body: Some(body),
        summary,
        principal_image,
        images,
    })
}

/// Trim the text and collapse runs of blank lines into one.
fn normalize_body(text: &str) -> String {
    BLANK_LINES.replace_all(text.trim(), "\n\n").into_owned()
}
