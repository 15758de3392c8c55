//! Fixed-size worker pool fed through a bounded queue.
//!
//! The queue holds at most one pending page per worker. Once every worker is
//! busy and the queue is full, [`WorkerPool::submit`] waits, which throttles
//! the page index to the speed of the workers. Results leave through an
//! unbounded channel so a worker never waits on reporting.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::error::{AppError, Result};
use crate::models::{PageDescriptor, PageResult};

/// Work done for a single page.
#[async_trait]
pub trait PageProcessor: Send + Sync + 'static {
    async fn process(&self, page: PageDescriptor) -> PageResult;
}

/// N workers draining a queue of capacity N.
pub struct WorkerPool {
    queue: async_channel::Sender<PageDescriptor>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers that report into `results`.
    pub fn spawn(
        size: usize,
        processor: Arc<dyn PageProcessor>,
        results: UnboundedSender<PageResult>,
    ) -> Self {
        let size = size.max(1);
        let (queue, jobs) = async_channel::bounded::<PageDescriptor>(size);

        let workers = (0..size)
            .map(|id| {
                let jobs = jobs.clone();
                let processor = Arc::clone(&processor);
                let results = results.clone();
                tokio::spawn(async move {
                    while let Ok(page) = jobs.recv().await {
                        let result = processor.process(page).await;
                        if results.send(result).is_err() {
                            log::error!("Result channel closed; worker {} stopping", id);
                            break;
                        }
                    }
                })
            })
            .collect();

        Self { queue, workers }
    }

    /// Number of workers.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Enqueue a page, waiting while the queue is full.
    pub async fn submit(&self, page: PageDescriptor) -> Result<()> {
        self.queue
            .send(page)
            .await
            .map_err(|e| AppError::pipeline(format!("worker pool closed before {}", e.0.title)))
    }

    /// Close the queue and wait until every queued page has been processed.
    pub async fn join(self) {
        self.queue.close();
        for outcome in join_all(self.workers).await {
            if let Err(e) = outcome {
                log::error!("Worker task failed: {}", e);
            }
        }
    }
}
