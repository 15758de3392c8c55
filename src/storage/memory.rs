//! In-memory metadata store.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ImageMetadata;

use super::MetadataStore;

/// HashMap-backed store, used when no database is available and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    images: HashMap<String, ImageMetadata>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `metadata` under its own name.
    pub fn insert(&mut self, metadata: ImageMetadata) {
        self.images.insert(metadata.name.clone(), metadata);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl FromIterator<ImageMetadata> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = ImageMetadata>>(iter: I) -> Self {
        let mut store = Self::new();
        for metadata in iter {
            store.insert(metadata);
        }
        store
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<Option<ImageMetadata>> {
        Ok(self.images.get(name).cloned())
    }
}
