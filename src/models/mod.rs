// src/models/mod.rs

//! Domain models for the regeneration crawler.

mod config;
mod figure;
mod image;
mod page;

// Re-export all public types
pub use config::{Config, CrawlerConfig, LoggingConfig, RetryConfig, StoreConfig, WikiConfig};
pub use figure::{DEFAULT_SIZE_CLASS, FigureNode, FigureVerdict, SkipReason, THUMBNAIL_TYPEOF};
pub use image::{ImageMetadata, MediaType};
pub use page::{AggregateStats, PageDescriptor, PageResult};
