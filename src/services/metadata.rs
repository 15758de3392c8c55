//! Image metadata resolution.
//!
//! Lookup order for a normalized resource name:
//!
//! 1. the local store, by exact name (no network call on a hit)
//! 2. the wiki, by the name as given
//! 3. the wiki, once more, by the percent-decoded name
//!
//! Decoding is only tried after the plain lookup came back empty, since it
//! changes the key and most names are already canonical.

use std::sync::Arc;

use crate::models::ImageMetadata;
use crate::storage::MetadataStore;
use crate::wiki::WikiClient;

/// Resolves image dimensions, cache first.
pub struct MetadataResolver {
    store: Arc<dyn MetadataStore>,
    wiki: Arc<dyn WikiClient>,
}

impl MetadataResolver {
    pub fn new(store: Arc<dyn MetadataStore>, wiki: Arc<dyn WikiClient>) -> Self {
        Self { store, wiki }
    }

    /// Metadata for `name`, or `None` when neither the store nor the wiki
    /// knows it. The returned metadata carries the name it resolved under.
    pub async fn resolve(&self, name: &str) -> Option<ImageMetadata> {
        match self.store.get(name).await {
            Ok(Some(metadata)) => return Some(metadata),
            Ok(None) => {}
            Err(e) => log::warn!("Metadata cache lookup failed for {}: {}", name, e),
        }

        if let Some(metadata) = self.remote(name).await {
            return Some(metadata);
        }

        let decoded = match urlencoding::decode(name) {
            Ok(decoded) if decoded != name => decoded.into_owned(),
            _ => return None,
        };
        log::debug!("Retrying {} as {}", name, decoded);
        self.remote(&decoded).await
    }

    async fn remote(&self, name: &str) -> Option<ImageMetadata> {
        match self.wiki.image_info(name).await {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("Image info request failed for {}: {}", name, e);
                None
            }
        }
    }
}
