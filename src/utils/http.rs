// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::Config;

/// Create a configured asynchronous HTTP client.
///
/// The per-call timeout covers the whole request, body included.
pub fn create_async_client(config: &Config) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.wiki.user_agent)
        .timeout(Duration::from_secs(config.crawler.timeout_secs))
        .pool_max_idle_per_host(config.crawler.workers)
        .build()?;
    Ok(client)
}
