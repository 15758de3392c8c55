//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Which wiki to crawl and where its endpoints live
    #[serde(default)]
    pub wiki: WikiConfig,

    /// Worker pool and crawl behavior
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Retry budgets for outbound calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Local image metadata cache
    #[serde(default)]
    pub store: StoreConfig,

    /// Console output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply `WP*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `WP*` overrides from an arbitrary lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup("WPPREFIX") {
            self.wiki.prefix = prefix;
        }
        if let Some(after) = lookup("WPAFTER") {
            self.crawler.after = Some(after).filter(|a| !a.is_empty());
        }
        if let Some(workers) = lookup("WPWORKERS") {
            self.crawler.workers = parse_number("WPWORKERS", &workers)?;
        }
        if let Some(timeout) = lookup("WPTIMEOUT") {
            self.crawler.timeout_secs = parse_number("WPTIMEOUT", &timeout)?;
        }
        if let Some(db) = lookup("WPIMAGEDB") {
            self.store.image_db = Some(PathBuf::from(db));
        }
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.wiki.user_agent.trim().is_empty() {
            return Err(AppError::validation("wiki.user_agent is empty"));
        }
        if self.wiki.prefix.trim().is_empty() {
            return Err(AppError::validation("wiki.prefix is empty"));
        }
        if self.crawler.workers == 0 {
            return Err(AppError::validation("crawler.workers must be > 0"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.thumb_size == 0 {
            return Err(AppError::validation("crawler.thumb_size must be > 0"));
        }
        if self.retry.api_attempts == 0 || self.retry.render_attempts == 0 {
            return Err(AppError::validation("retry attempts must be > 0"));
        }
        url::Url::parse(&self.api_url())?;
        url::Url::parse(&self.render_url())?;
        Ok(())
    }

    /// Wiki prefix, always ending in `wiki` (e.g. `enwiki`).
    pub fn prefix(&self) -> String {
        let prefix = self.wiki.prefix.trim();
        if prefix.ends_with("wiki") {
            prefix.to_string()
        } else {
            format!("{prefix}wiki")
        }
    }

    /// Language subdomain derived from the prefix (e.g. `en`).
    pub fn language(&self) -> String {
        let prefix = self.prefix();
        prefix
            .strip_suffix("wiki")
            .unwrap_or(&prefix)
            .to_string()
    }

    /// Action API endpoint.
    pub fn api_url(&self) -> String {
        self.wiki
            .api_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.wikipedia.org/w/api.php", self.language()))
    }

    /// Rendering endpoint; page titles are appended to it.
    pub fn render_url(&self) -> String {
        let mut base = self.wiki.render_url.clone().unwrap_or_else(|| {
            format!(
                "https://{}.wikipedia.org/api/rest_v1/page/html/",
                self.language()
            )
        });
        if !base.ends_with('/') {
            base.push('/');
        }
        base
    }

    /// Path of the local image metadata database.
    pub fn image_db_path(&self) -> PathBuf {
        self.store
            .image_db
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}-images.db", self.prefix())))
    }

    /// Path of the stored-figure database read by a rescan.
    pub fn pages_db_path(&self) -> PathBuf {
        self.store
            .pages_db
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}-pages.db", self.prefix())))
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::config(format!("{key} must be a number, got '{value}'")))
}

/// Target wiki settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiConfig {
    /// Database-style wiki identifier, e.g. `enwiki` or `de`
    #[serde(default = "defaults::prefix")]
    pub prefix: String,

    /// Override for the action API endpoint
    #[serde(default)]
    pub api_url: Option<String>,

    /// Override for the rendered-HTML endpoint
    #[serde(default)]
    pub render_url: Option<String>,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Pin renders to the page id as a revision
    #[serde(default)]
    pub pin_revision: bool,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            prefix: defaults::prefix(),
            api_url: None,
            render_url: None,
            user_agent: defaults::user_agent(),
            pin_revision: false,
        }
    }
}

/// Worker pool and crawl behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Number of parallel page workers
    #[serde(default = "defaults::workers")]
    pub workers: usize,

    /// Per-call timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Resume the page index after this cursor
    #[serde(default)]
    pub after: Option<String>,

    /// Bounding box for regenerated thumbnails, in pixels
    #[serde(default = "defaults::thumb_size")]
    pub thumb_size: u32,

    /// Minimum interval between progress lines
    #[serde(default = "defaults::progress_interval")]
    pub progress_interval_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: defaults::workers(),
            timeout_secs: defaults::timeout(),
            after: None,
            thumb_size: defaults::thumb_size(),
            progress_interval_ms: defaults::progress_interval(),
        }
    }
}

/// Retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts for API, metadata and thumbnail calls
    #[serde(default = "defaults::api_attempts")]
    pub api_attempts: u32,

    /// Attempts for rendered-page fetches
    #[serde(default = "defaults::render_attempts")]
    pub render_attempts: u32,

    /// Linear backoff step; attempt `n` waits `n * step`
    #[serde(default = "defaults::backoff_step")]
    pub backoff_step_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            api_attempts: defaults::api_attempts(),
            render_attempts: defaults::render_attempts(),
            backoff_step_secs: defaults::backoff_step(),
        }
    }
}

/// Local metadata store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database with an `image` table; `<prefix>-images.db` if unset
    #[serde(default)]
    pub image_db: Option<PathBuf>,

    /// SQLite database with a `figure` table; `<prefix>-pages.db` if unset
    #[serde(default)]
    pub pages_db: Option<PathBuf>,
}

/// Console output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Print the throttled progress line
    #[serde(default = "defaults::show_progress")]
    pub show_progress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            show_progress: defaults::show_progress(),
        }
    }
}

mod defaults {
    pub fn prefix() -> String {
        "enwiki".into()
    }
    pub fn user_agent() -> String {
        "thumb-regen/0.1 (default-size thumbnail regeneration)".into()
    }
    pub fn workers() -> usize {
        50
    }
    pub fn timeout() -> u64 {
        4 * 60
    }
    pub fn thumb_size() -> u32 {
        crate::services::DEFAULT_BOUNDING_BOX
    }
    pub fn progress_interval() -> u64 {
        500
    }
    pub fn api_attempts() -> u32 {
        4
    }
    pub fn render_attempts() -> u32 {
        3
    }
    pub fn backoff_step() -> u64 {
        5
    }
    pub fn show_progress() -> bool {
        true
    }
}
