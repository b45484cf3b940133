//! Fallback extraction tier: document metadata heuristics.
//!
//! Works on HTML that was already downloaded and always produces a draft,
//! possibly with an empty title and no images.
//!
//! # Precedence
//!
//! - Title: `og:title` content, else `<title>` text, else empty
//! - Summary: `og:description` content, else `<meta name="description">`
//! - Images: `og:image` first, then `<img src>` in document order, absolute,
//!   deduplicated, at most [`MAX_IMAGES`]

use super::{Extractor, Page, page_images};
use crate::error::ExtractError;
use crate::models::ArticleDraft;
use crate::utils::resolve_url;
use futures::future::BoxFuture;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

/// Most candidate images kept, counting the Open Graph image.
pub const MAX_IMAGES: usize = 5;

static OG_TITLE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:title"]"#));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| selector(r#"meta[property="og:description"]"#));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static OG_IMAGE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:image"]"#));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataExtractor;

impl Extractor for MetadataExtractor {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn extract<'a>(&'a self, page: &'a Page) -> BoxFuture<'a, Result<ArticleDraft, ExtractError>> {
        let draft = extract_metadata(&page.url, &page.html);
        Box::pin(async move { Ok(draft) })
    }
}

/// Best-effort draft from the `<head>` metadata and `<img>` tags of `html`.
pub fn extract_metadata(url: &str, html: &str) -> ArticleDraft {
    let document = Html::parse_document(html);
    let base = Url::parse(url).ok();

    let title = meta_content(&document, &OG_TITLE)
        .or_else(|| {
            document
                .select(&TITLE)
                .next()
                .map(|t| t.text().collect::<String>())
        })
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    let summary =
        meta_content(&document, &OG_DESCRIPTION).or_else(|| meta_content(&document, &DESCRIPTION));

    let og_image = meta_content(&document, &OG_IMAGE)
        .filter(|src| !src.trim().is_empty())
        .and_then(|src| resolve_url(base.as_ref(), &src));
    let images: Vec<String> = og_image
        .into_iter()
        .chain(page_images(&document, base.as_ref()))
        .unique()
        .take(MAX_IMAGES)
        .collect();

    ArticleDraft {
        title,
        body: None,
        summary,
        principal_image: images.first().cloned(),
        images,
    }
}

/// `content` attribute of the first element matching `selector`.
fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::to_string)
}
