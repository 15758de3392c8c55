//! Remote wiki endpoints consumed by the crawler.
//!
//! [`WikiClient`] is the seam between the pipeline and the network: the page
//! index, the image metadata query, the thumbnail URL query, the rendering
//! endpoint and plain byte fetches. [`HttpWikiClient`] is the production
//! implementation; every method applies its own retry policy and reports a
//! failure only once that budget is spent.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ImageMetadata, PageDescriptor};

pub use http::HttpWikiClient;

/// Pages in the index requested per call.
pub const PAGE_BATCH_SIZE: usize = 100;

/// One batch of the page index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageBatch {
    /// Pages in index order
    pub pages: Vec<PageDescriptor>,
    /// Continuation cursor; `None` on the last batch
    pub next: Option<String>,
}

/// Operations the crawler needs from the wiki.
#[async_trait]
pub trait WikiClient: Send + Sync {
    /// Fetch one batch of non-redirect main-namespace pages after `cursor`.
    async fn list_pages(&self, cursor: Option<&str>) -> Result<PageBatch>;

    /// Size and media type of `name`, or `None` if the wiki does not know it.
    async fn image_info(&self, name: &str) -> Result<Option<ImageMetadata>>;

    /// URL of `name` scaled into a `bounding_box` square, if one is offered.
    async fn thumbnail_url(&self, name: &str, bounding_box: u32) -> Result<Option<String>>;

    /// Rendered HTML of a page.
    async fn render_page(&self, page: &PageDescriptor) -> Result<String>;

    /// GET `url` and return how many bytes came back.
    async fn fetch_length(&self, url: &str) -> Result<usize>;
}
