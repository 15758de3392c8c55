//! Pipeline entry point for thumbnail regeneration.
//!
//! - `run_regen`: Walk the page index through a bounded worker pool
//! - `run_rescan`: Re-examine figure markup stored by an earlier crawl
//!
//! Pages flow source → pool → worker → aggregator. Workers share nothing
//! but the wiki client and the metadata store; all counting happens in the
//! aggregator.

pub mod aggregate;
pub mod pool;
pub mod regen;
#[cfg(feature = "sqlite")]
pub mod rescan;
pub mod worker;

pub use aggregate::Aggregator;
pub use pool::{PageProcessor, WorkerPool};
pub use regen::run_regen;
#[cfg(feature = "sqlite")]
pub use rescan::run_rescan;
pub use worker::PageWorker;
