//! Thumbnail regeneration by request.

use std::sync::Arc;

use crate::wiki::WikiClient;

/// Default bounding box of a thumbnail, in pixels.
pub const DEFAULT_BOUNDING_BOX: u32 = 220;

/// Forces the rendering service to produce a thumbnail by fetching it.
pub struct ThumbnailFetcher {
    wiki: Arc<dyn WikiClient>,
    bounding_box: u32,
}

impl ThumbnailFetcher {
    pub fn new(wiki: Arc<dyn WikiClient>, bounding_box: u32) -> Self {
        Self { wiki, bounding_box }
    }

    /// Fetch the thumbnail of `name` and return how many bytes arrived,
    /// or `None` if no thumbnail URL was offered or the fetch failed.
    /// The bytes themselves are discarded.
    pub async fn regenerate(&self, name: &str) -> Option<usize> {
        let url = match self.wiki.thumbnail_url(name, self.bounding_box).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                log::warn!("NO THUMB URL for {}", name);
                return None;
            }
            Err(e) => {
                log::warn!("Thumbnail URL lookup failed for {}: {}", name, e);
                return None;
            }
        };

        match self.wiki.fetch_length(&url).await {
            Ok(length) => {
                log::info!("Generated {} ({} bytes)", name, length);
                Some(length)
            }
            Err(e) => {
                log::warn!("FAILED TO FETCH THUMB {}: {}", url, e);
                None
            }
        }
    }
}
