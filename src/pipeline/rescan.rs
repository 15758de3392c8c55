// src/pipeline/rescan.rs

//! Re-examination of figures stored by an earlier crawl.
//!
//! No page is rendered: each stored `<figure>` goes straight through the
//! same evaluate/regenerate path a crawled page uses.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use crate::error::Result;
use crate::models::{AggregateStats, Config};
use crate::storage::{FigureArchive, MetadataStore};
use crate::utils::console;
use crate::wiki::WikiClient;

use super::aggregate::Throttle;
use super::worker::PageWorker;

/// Regenerate thumbnails for every qualifying figure in `archive`.
pub async fn run_rescan(
    config: &Config,
    archive: &FigureArchive,
    wiki: Arc<dyn WikiClient>,
    store: Arc<dyn MetadataStore>,
) -> Result<AggregateStats> {
    let prefix = config.prefix();
    console::header(&format!("Rescanning stored figures on {prefix}"));
    log::info!("{} stored figures", archive.count().await?);

    let worker = PageWorker::new(config, wiki, store)?;
    let worker = &worker;
    let mut throttle = Throttle::new(Duration::from_millis(config.crawler.progress_interval_ms));
    let mut stats = AggregateStats::default();

    let mut results = archive
        .figures()
        .map(|row| async move {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    log::error!("Unreadable figure row: {}", e);
                    return None;
                }
            };
            let Some(html) = row.html else {
                log::warn!("{} figure {}: no stored markup", row.page, row.figure_id);
                return None;
            };
            Some(worker.examine_markup(&row.page, &html).await)
        })
        .buffer_unordered(config.crawler.workers.max(1));

    while let Some(result) = results.next().await {
        let Some(result) = result else {
            continue;
        };
        stats.absorb(&result);
        if throttle.ready() {
            console::progress(&console::progress_line(
                &prefix,
                stats.pages,
                stats.figures,
                stats.regenerated,
                &result.title,
            ));
        }
    }

    console::summary(&format!("{prefix} rescan complete"), &stats.figure_items());
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageMetadata, MediaType, SkipReason};
    use crate::storage::MemoryStore;
    use crate::storage::figures::tests::seed;
    use crate::wiki::mock::MockWiki;

    fn figure(resource: &str, class: &str) -> String {
        format!(
            r#"<figure typeof="mw:Image/Thumb" class="{class}">
            <img resource="./{resource}"/></figure>"#
        )
    }

    #[tokio::test]
    async fn test_rescan_evaluates_stored_figures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enwiki-pages.db");
        let tall = figure("File:Tall.jpg", "mw-default-size");
        let wide = figure("File:Wide.jpg", "mw-default-size");
        let sized = figure("File:Tall.jpg", "mw-halign-left");
        seed(
            &path,
            &[
                ("A", 0, Some(tall.as_str())),
                ("A", 1, Some(wide.as_str())),
                ("B", 0, Some(sized.as_str())),
                ("C", 0, None),
            ],
        )
        .await;

        let store: MemoryStore = [
            ImageMetadata::new("File:Tall.jpg", 100, 200, MediaType::Bitmap),
            ImageMetadata::new("File:Wide.jpg", 200, 100, MediaType::Bitmap),
        ]
        .into_iter()
        .collect();
        let wiki = Arc::new(MockWiki::new());
        let mut config = Config::default();
        config.crawler.workers = 2;

        let archive = FigureArchive::open(&path).await.unwrap();
        let stats = run_rescan(
            &config,
            &archive,
            Arc::clone(&wiki) as Arc<dyn WikiClient>,
            Arc::new(store),
        )
        .await
        .unwrap();

        assert_eq!(stats.figures, 3);
        assert_eq!(stats.regenerated, 1);
        assert_eq!(stats.skipped.get(&SkipReason::NotPortrait), Some(&1));
        assert_eq!(stats.skipped.get(&SkipReason::ExplicitSize), Some(&1));
        assert_eq!(stats.pages_failed, 0);
        assert_eq!(wiki.fetch_count(), 1);
        assert!(wiki.image_info_calls().is_empty());
    }

    #[tokio::test]
    async fn test_rescan_of_empty_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enwiki-pages.db");
        seed(&path, &[]).await;

        let archive = FigureArchive::open(&path).await.unwrap();
        let stats = run_rescan(
            &Config::default(),
            &archive,
            Arc::new(MockWiki::new()),
            Arc::new(MemoryStore::new()),
        )
        .await
        .unwrap();

        assert_eq!(stats, AggregateStats::default());
    }
}
