//! Local mirroring of principal images.
//!
//! Images are stored flat in the image directory as `<slug><extension>`,
//! where the slug is derived from the image URL. Two URLs that normalise to
//! the same slug overwrite each other.

use crate::error::MirrorError;
use crate::fetch::Fetch;
use crate::utils::{image_extension, slug};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, instrument};

pub struct ImageMirror {
    fetcher: Arc<dyn Fetch>,
    dir: PathBuf,
}

impl ImageMirror {
    pub fn new(fetcher: Arc<dyn Fetch>, dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            dir: dir.into(),
        }
    }

    /// File name an image URL is mirrored under.
    pub fn file_name(image_url: &str) -> String {
        format!("{}{}", slug(image_url), image_extension(image_url))
    }

    /// Download `image_url` once and write the raw body into the image
    /// directory. Returns the written path.
    #[instrument(level = "info", skip(self))]
    pub async fn mirror(&self, image_url: &str) -> Result<PathBuf, MirrorError> {
        let bytes = self.fetcher.fetch(image_url).await?;
        let path = self.dir.join(Self::file_name(image_url));
        fs::write(&path, &bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "Mirrored image");
        Ok(path)
    }
}
