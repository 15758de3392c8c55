//! Lazy enumeration of the wiki's page index.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::models::PageDescriptor;
use crate::wiki::WikiClient;

/// Forward-only cursor over the page index.
///
/// Pages are fetched a batch at a time and yielded in index order. The
/// sequence is finite and cannot be rewound; it can only be started after a
/// cursor saved from an earlier run. If a batch cannot be fetched the
/// sequence ends there, leaving the rest of the index untraversed.
pub struct PageSource {
    wiki: Arc<dyn WikiClient>,
    cursor: Option<String>,
    buffer: VecDeque<PageDescriptor>,
    finished: bool,
    failed: bool,
}

impl PageSource {
    /// Start at the beginning of the index, or after `cursor`.
    pub fn new(wiki: Arc<dyn WikiClient>, cursor: Option<String>) -> Self {
        Self {
            wiki,
            cursor,
            buffer: VecDeque::new(),
            finished: false,
            failed: false,
        }
    }

    /// Next page in index order, or `None` once the index is exhausted.
    pub async fn next(&mut self) -> Option<PageDescriptor> {
        while self.buffer.is_empty() && !self.finished {
            self.fetch_batch().await;
        }
        self.buffer.pop_front()
    }

    /// Cursor of the batch after the one being yielded; resume point.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Whether enumeration stopped because the index became unreachable.
    pub fn failed(&self) -> bool {
        self.failed
    }

    async fn fetch_batch(&mut self) {
        if let Some(cursor) = &self.cursor {
            log::info!("Continuing page index after {}", cursor);
        }
        match self.wiki.list_pages(self.cursor.as_deref()).await {
            Ok(batch) => {
                self.buffer.extend(batch.pages);
                match batch.next {
                    Some(next) if self.cursor.as_deref() == Some(next.as_str()) => {
                        log::warn!("Page index returned the same cursor {}; stopping", next);
                        self.finished = true;
                    }
                    Some(next) => self.cursor = Some(next),
                    None => self.finished = true,
                }
            }
            Err(e) => {
                log::error!(
                    "Page index unavailable after {}: {}; ending enumeration",
                    self.cursor.as_deref().unwrap_or("<start>"),
                    e
                );
                self.failed = true;
                self.finished = true;
            }
        }
    }
}
