//! Service layer for the regeneration crawler.
//!
//! This module contains the per-page business logic:
//! - Page index enumeration (`PageSource`)
//! - Rendered page fetching (`ContentFetcher`)
//! - Image metadata lookup (`MetadataResolver`)
//! - The regeneration decision (`evaluator`)
//! - Thumbnail requests (`ThumbnailFetcher`)

mod content;
pub mod evaluator;
mod metadata;
mod pages;
mod thumbnail;

pub use content::ContentFetcher;
pub use metadata::MetadataResolver;
pub use pages::PageSource;
pub use thumbnail::{DEFAULT_BOUNDING_BOX, ThumbnailFetcher};
