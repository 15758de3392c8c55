//! Stored figure markup from an earlier crawl.
//!
//! ```text
//! figure (
//!     name    TEXT,     -- page title
//!     figid   INTEGER,  -- position of the figure on its page
//!     figure  TEXT      -- outer HTML of the <figure> element
//! )
//! ```

use std::path::Path;

use futures::StreamExt;
use futures::stream::BoxStream;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::{AppError, Result};

/// One row of the `figure` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFigure {
    pub page: String,
    pub figure_id: i64,
    /// Markup of the figure; `None` when the row holds no HTML
    pub html: Option<String>,
}

/// Read-only view over a `figure` table.
pub struct FigureArchive {
    pool: SqlitePool,
}

impl FigureArchive {
    /// Open the database at `path` read-only.
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppError::config(format!(
                "figure database not found at {}",
                path.display()
            )));
        }
        let options = SqliteConnectOptions::new().filename(path).read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Number of stored figures.
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM figure")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Every stored figure, streamed in table order.
    pub fn figures(&self) -> BoxStream<'_, Result<StoredFigure>> {
        sqlx::query_as::<_, (String, i64, Option<String>)>(
            "SELECT name, figid, figure FROM figure",
        )
        .fetch(&self.pool)
        .map(|row| -> Result<StoredFigure> {
            let (page, figure_id, html) = row?;
            Ok(StoredFigure {
                page,
                figure_id,
                html,
            })
        })
        .boxed()
    }
}
