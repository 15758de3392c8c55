// src/pipeline/aggregate.rs

//! Single consumer of page results.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

use crate::models::{AggregateStats, PageResult};
use crate::utils::console;

/// Minimum-interval gate for progress output.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True if at least `interval` has passed since the last `true`.
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Folds page results into running totals and reports progress.
pub struct Aggregator {
    prefix: String,
    throttle: Throttle,
    stats: AggregateStats,
}

impl Aggregator {
    pub fn new(prefix: impl Into<String>, interval: Duration) -> Self {
        Self {
            prefix: prefix.into(),
            throttle: Throttle::new(interval),
            stats: AggregateStats::default(),
        }
    }

    /// Fold one result; returns the progress line if one is due.
    pub fn absorb(&mut self, result: &PageResult) -> Option<String> {
        self.stats.absorb(result);
        self.throttle.ready().then(|| {
            console::progress_line(
                &self.prefix,
                self.stats.pages,
                self.stats.figures,
                self.stats.regenerated,
                &result.title,
            )
        })
    }

    /// Consume results until every sender is gone, then print the summary.
    pub async fn run(mut self, mut results: UnboundedReceiver<PageResult>) -> AggregateStats {
        while let Some(result) = results.recv().await {
            if let Some(line) = self.absorb(&result) {
                console::progress(&line);
            }
        }

        console::summary(
            &format!("{} regeneration complete", self.prefix),
            &self.stats.summary_items(),
        );
        self.stats
    }
}
