//! Page-level records flowing through the pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::figure::{FigureVerdict, SkipReason};

/// A page yielded by the wiki's page index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    /// Page title as returned by the index (spaces, not underscores)
    pub title: String,

    /// Page identifier
    #[serde(rename = "pageid")]
    pub page_id: u64,
}

impl PageDescriptor {
    pub fn new(title: impl Into<String>, page_id: u64) -> Self {
        Self {
            title: title.into(),
            page_id,
        }
    }
}

/// Outcome of processing one page, sent once to the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    pub title: String,
    pub figures_examined: u64,
    pub figures_regenerated: u64,
    /// Skipped figures, by reason
    pub skipped: BTreeMap<SkipReason, u64>,
    /// The rendered page could not be fetched
    pub render_failed: bool,
}

impl PageResult {
    /// Start an empty result for a page.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Result for a page whose rendering could not be fetched.
    pub fn render_failed(title: impl Into<String>) -> Self {
        Self {
            render_failed: true,
            ..Self::new(title)
        }
    }

    /// Count one examined figure with its final verdict.
    pub fn record(&mut self, verdict: FigureVerdict) {
        self.figures_examined += 1;
        match verdict {
            FigureVerdict::Regenerate => self.figures_regenerated += 1,
            FigureVerdict::Skip(reason) => *self.skipped.entry(reason).or_insert(0) += 1,
        }
    }
}

/// Running totals for one crawl. Only the aggregator mutates these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub pages: u64,
    pub figures: u64,
    pub regenerated: u64,
    pub pages_failed: u64,
    pub skipped: BTreeMap<SkipReason, u64>,
}

impl AggregateStats {
    /// Fold one page result into the totals.
    pub fn absorb(&mut self, result: &PageResult) {
        self.pages += 1;
        self.figures += result.figures_examined;
        self.regenerated += result.figures_regenerated;
        if result.render_failed {
            self.pages_failed += 1;
        }
        for (reason, count) in &result.skipped {
            *self.skipped.entry(*reason).or_insert(0) += count;
        }
    }

    /// Summary rows for console output.
    pub fn summary_items(&self) -> Vec<(&'static str, String)> {
        let mut items = vec![
            ("Total pages", self.pages.to_string()),
            ("Pages not rendered", self.pages_failed.to_string()),
        ];
        items.extend(self.figure_items());
        items
    }

    /// Figure-level rows only, for runs that have no pages of their own.
    pub fn figure_items(&self) -> Vec<(&'static str, String)> {
        let mut items = vec![
            ("Total figures", self.figures.to_string()),
            ("Total regenerated", self.regenerated.to_string()),
        ];
        for (reason, count) in &self.skipped {
            items.push((reason.as_str(), count.to_string()));
        }
        items
    }
}
