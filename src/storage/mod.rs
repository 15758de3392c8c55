//! Local image metadata stores.
//!
//! A store is a read-only cache filled by a separate ingestion run. It is
//! keyed by normalized resource name (`File:Foo.jpg`), matching the names
//! the crawler looks up.
//!
//! ## Table Layout
//!
//! ```text
//! image (
//!     name      TEXT PRIMARY KEY,  -- e.g. "File:Foo.jpg"
//!     width     INT,
//!     height    INT,
//!     mediatype TEXT               -- BITMAP, DRAWING, ...
//! )
//! ```

#[cfg(feature = "sqlite")]
pub mod figures;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ImageMetadata;

// Re-export for convenience
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use figures::{FigureArchive, StoredFigure};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Exact-match lookup of cached image metadata.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Metadata stored under `name`, if any.
    async fn get(&self, name: &str) -> Result<Option<ImageMetadata>>;
}

/// Open the store at `path`, or an empty one when no database exists there.
pub async fn open_store(path: &Path) -> Result<Arc<dyn MetadataStore>> {
    if let Some(store) = open_database(path).await? {
        log::info!("Using image metadata cache {}", path.display());
        return Ok(store);
    }

    log::info!(
        "No image metadata cache at {}; all lookups go to the wiki",
        path.display()
    );
    Ok(Arc::new(MemoryStore::default()))
}

#[cfg(feature = "sqlite")]
async fn open_database(path: &Path) -> Result<Option<Arc<dyn MetadataStore>>> {
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(Arc::new(SqliteStore::open(path).await?)))
}

#[cfg(not(feature = "sqlite"))]
async fn open_database(_path: &Path) -> Result<Option<Arc<dyn MetadataStore>>> {
    Ok(None)
}
