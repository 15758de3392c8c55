//! Rendered page fetching and figure extraction.

use std::sync::Arc;

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{FigureNode, PageDescriptor};
use crate::wiki::WikiClient;

/// Fetches a page's rendered HTML and snapshots its `<figure>` elements.
pub struct ContentFetcher {
    wiki: Arc<dyn WikiClient>,
    figure_sel: Selector,
    image_sel: Selector,
}

impl ContentFetcher {
    pub fn new(wiki: Arc<dyn WikiClient>) -> Result<Self> {
        Ok(Self {
            wiki,
            figure_sel: Self::parse_selector("figure")?,
            image_sel: Self::parse_selector("img[resource]")?,
        })
    }

    /// Figures of `page`, or `None` when the render could not be fetched.
    ///
    /// A failed render is logged here and never propagated: one broken page
    /// must not stop the crawl.
    pub async fn fetch(&self, page: &PageDescriptor) -> Option<Vec<FigureNode>> {
        match self.wiki.render_page(page).await {
            Ok(html) => Some(self.extract_figures(&html)),
            Err(e) => {
                log::warn!("SKIPPING {} (render fetch failed): {}", page.title, e);
                None
            }
        }
    }

    /// Snapshot every `<figure>` anywhere in the document.
    pub fn extract_figures(&self, html: &str) -> Vec<FigureNode> {
        let document = Html::parse_document(html);
        document
            .select(&self.figure_sel)
            .map(|figure| {
                let element = figure.value();
                let resource = figure
                    .select(&self.image_sel)
                    .next()
                    .and_then(|img| img.value().attr("resource"));
                FigureNode::new(element.attr("typeof"), element.attr("class"), resource)
            })
            .collect()
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s)
            .map_err(|e| AppError::validation(format!("invalid selector '{s}': {e:?}")))
    }
}
