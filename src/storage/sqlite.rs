//! SQLite-backed metadata store.
//!
//! Opens an existing image database read-only; this crate never writes to it.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;
use crate::models::{ImageMetadata, MediaType};

use super::MetadataStore;

/// Read-only view over an `image` table.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the database at `path` read-only.
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(path).read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn get(&self, name: &str) -> Result<Option<ImageMetadata>> {
        let row: Option<(Option<i64>, Option<i64>, Option<String>)> =
            sqlx::query_as("SELECT width, height, mediatype FROM image WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        let Some((Some(width), Some(height), Some(media_type))) = row else {
            return Ok(None);
        };
        let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
            log::warn!("Ignoring cached entry {name} with invalid size {width}x{height}");
            return Ok(None);
        };
        Ok(Some(ImageMetadata::new(
            name,
            width,
            height,
            MediaType::from(media_type),
        )))
    }
}
