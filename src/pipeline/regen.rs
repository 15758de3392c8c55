// src/pipeline/regen.rs

//! Thumbnail regeneration pipeline.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;

use crate::error::{AppError, Result};
use crate::models::{AggregateStats, Config};
use crate::services::PageSource;
use crate::storage::MetadataStore;
use crate::utils::console;
use crate::wiki::WikiClient;

use super::aggregate::Aggregator;
use super::pool::WorkerPool;
use super::worker::PageWorker;

/// Walk the page index and regenerate default-size portrait thumbnails.
///
/// Pages are handed to a pool of `crawler.workers` workers; the index is
/// only read as fast as the pool drains it. Returns once every submitted
/// page has been reported.
pub async fn run_regen(
    config: &Config,
    wiki: Arc<dyn WikiClient>,
    store: Arc<dyn MetadataStore>,
) -> Result<AggregateStats> {
    let start_time = Utc::now();
    let prefix = config.prefix();
    console::header(&format!("Regenerating thumbnails on {prefix}"));

    let (results_tx, results_rx) = mpsc::unbounded_channel();
    let aggregator = tokio::spawn(
        Aggregator::new(
            prefix.as_str(),
            Duration::from_millis(config.crawler.progress_interval_ms),
        )
        .run(results_rx),
    );

    let worker = PageWorker::new(config, Arc::clone(&wiki), store)?;
    let pool = WorkerPool::spawn(config.crawler.workers, Arc::new(worker), results_tx);
    log::info!("Started {} workers", pool.size());

    let mut source = PageSource::new(wiki, config.crawler.after.clone());
    while let Some(page) = source.next().await {
        if let Err(e) = pool.submit(page).await {
            log::error!("{}", e);
            break;
        }
    }
    pool.join().await;

    let stats = aggregator
        .await
        .map_err(|e| AppError::pipeline(format!("aggregator failed: {e}")))?;

    if source.failed() {
        match source.cursor() {
            Some(cursor) => log::warn!("Page index incomplete; resume with WPAFTER={}", cursor),
            None => log::warn!("Page index unreachable; nothing was crawled"),
        }
    }

    let elapsed = Utc::now() - start_time;
    log::info!(
        "Processed {} pages in {}s",
        stats.pages,
        elapsed.num_seconds()
    );

    Ok(stats)
}
