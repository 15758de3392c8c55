//! In-memory [`WikiClient`] for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{AppError, NetworkError, Result};
use crate::models::{ImageMetadata, MediaType, PageDescriptor};

use super::{PageBatch, WikiClient};

/// Scripted wiki with call recording.
#[derive(Default)]
pub struct MockWiki {
    /// Index batches; the cursor of batch `n + 1` is `"n + 1"`
    pub batches: Vec<Vec<PageDescriptor>>,
    /// Every index call fails
    pub fail_listing: bool,
    /// Remote image metadata by name
    pub images: HashMap<String, (u32, u32)>,
    /// Names for which no thumbnail URL is offered
    pub no_thumbnail: HashSet<String>,
    /// Rendered HTML by page title; unknown titles fail to render
    pub renders: HashMap<String, String>,

    pub list_calls: AtomicUsize,
    pub image_info_calls: Mutex<Vec<String>>,
    pub thumbnail_calls: Mutex<Vec<(String, u32)>>,
    pub fetches: AtomicUsize,
}

impl MockWiki {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, name: &str, width: u32, height: u32) -> Self {
        self.images.insert(name.to_string(), (width, height));
        self
    }

    pub fn with_render(mut self, title: &str, html: &str) -> Self {
        self.renders.insert(title.to_string(), html.to_string());
        self
    }

    pub fn with_batch(mut self, pages: &[(&str, u64)]) -> Self {
        self.batches.push(
            pages
                .iter()
                .map(|(title, id)| PageDescriptor::new(*title, *id))
                .collect(),
        );
        self
    }

    pub fn image_info_calls(&self) -> Vec<String> {
        self.image_info_calls.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WikiClient for MockWiki {
    async fn list_pages(&self, cursor: Option<&str>) -> Result<PageBatch> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(AppError::network(
                "allpages",
                NetworkError::Timeout("mock".to_string()),
            ));
        }
        let index = match cursor {
            None => 0,
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| AppError::validation(format!("bad cursor {c}")))?,
        };
        let pages = self.batches.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.batches.len()).then(|| (index + 1).to_string());
        Ok(PageBatch { pages, next })
    }

    async fn image_info(&self, name: &str) -> Result<Option<ImageMetadata>> {
        self.image_info_calls.lock().unwrap().push(name.to_string());
        Ok(self
            .images
            .get(name)
            .map(|(w, h)| ImageMetadata::new(name, *w, *h, MediaType::Bitmap)))
    }

    async fn thumbnail_url(&self, name: &str, bounding_box: u32) -> Result<Option<String>> {
        self.thumbnail_calls
            .lock()
            .unwrap()
            .push((name.to_string(), bounding_box));
        if self.no_thumbnail.contains(name) {
            return Ok(None);
        }
        Ok(Some(format!("https://upload.test/{bounding_box}px-{name}")))
    }

    async fn render_page(&self, page: &PageDescriptor) -> Result<String> {
        self.renders.get(&page.title).cloned().ok_or_else(|| {
            AppError::network(page.title.as_str(), NetworkError::Status { code: 503 })
        })
    }

    async fn fetch_length(&self, url: &str) -> Result<usize> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(url.len())
    }
}
