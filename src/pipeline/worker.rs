// src/pipeline/worker.rs

//! Per-page processing: render, evaluate each figure, regenerate.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Config, FigureNode, FigureVerdict, PageDescriptor, PageResult, SkipReason};
use crate::services::{ContentFetcher, MetadataResolver, ThumbnailFetcher, evaluator};
use crate::storage::MetadataStore;
use crate::wiki::WikiClient;

use super::pool::PageProcessor;

/// Processes one page end to end. Shared by every worker in the pool.
pub struct PageWorker {
    content: ContentFetcher,
    resolver: MetadataResolver,
    thumbnails: ThumbnailFetcher,
}

impl PageWorker {
    pub fn new(
        config: &Config,
        wiki: Arc<dyn WikiClient>,
        store: Arc<dyn MetadataStore>,
    ) -> Result<Self> {
        Ok(Self {
            content: ContentFetcher::new(Arc::clone(&wiki))?,
            resolver: MetadataResolver::new(store, Arc::clone(&wiki)),
            thumbnails: ThumbnailFetcher::new(wiki, config.crawler.thumb_size),
        })
    }

    /// Evaluate every figure in stored markup, as if it were a rendered page.
    pub async fn examine_markup(&self, title: &str, html: &str) -> PageResult {
        let figures = self.content.extract_figures(html);
        self.examine_all(title, &figures).await
    }

    async fn examine_all(&self, title: &str, figures: &[FigureNode]) -> PageResult {
        let mut result = PageResult::new(title);
        for figure in figures {
            let verdict = self.examine(title, figure).await;
            result.record(verdict);
        }
        result
    }

    /// Decide on one figure and regenerate its thumbnail if it qualifies.
    async fn examine(&self, title: &str, figure: &FigureNode) -> FigureVerdict {
        let name = match evaluator::candidate(figure) {
            Ok(name) => name,
            Err(reason) => {
                log_skip(title, figure.resource.as_deref().unwrap_or("-"), reason);
                return FigureVerdict::Skip(reason);
            }
        };

        let metadata = self.resolver.resolve(&name).await;
        if let FigureVerdict::Skip(reason) = evaluator::evaluate(figure, metadata.as_ref()) {
            log_skip(title, &name, reason);
            return FigureVerdict::Skip(reason);
        }
        let Some(metadata) = metadata else {
            return FigureVerdict::Skip(SkipReason::UnresolvableImage);
        };

        log::debug!(
            "{}: {} is {}x{}, regenerating",
            title,
            metadata.name,
            metadata.width,
            metadata.height
        );
        match self.thumbnails.regenerate(&metadata.name).await {
            Some(_) => FigureVerdict::Regenerate,
            None => FigureVerdict::Skip(SkipReason::ThumbnailUnavailable),
        }
    }
}

#[async_trait]
impl PageProcessor for PageWorker {
    async fn process(&self, page: PageDescriptor) -> PageResult {
        let Some(figures) = self.content.fetch(&page).await else {
            return PageResult::render_failed(page.title);
        };

        self.examine_all(&page.title, &figures).await
    }
}

fn log_skip(title: &str, name: &str, reason: SkipReason) {
    match reason {
        SkipReason::MissingImage => log::warn!("{}: FIGURE WITHOUT IMAGE", title),
        SkipReason::UnresolvableImage => log::warn!("{}: NO METADATA for {}", title, name),
        _ => log::debug!("{}: skipping {} ({})", title, name, reason),
    }
}
