//! # Catalog Repositories
//!
//! Per-kind use-case surface over the query engine. Each repository exposes
//! the two request-layer operations:
//!
//! - `list_items` - one page of records in the requested order
//! - `filter_counts` - `{total, starred, recent_play}` for the same filters
//!
//! plus `*_with_cancel` variants bound to the caller's cancellation token.
//!
//! ## Available Repositories
//!
//! - `ArtistRepository` - search and starred filters
//! - `AlbumRepository` - artist and release-year window filters
//! - `MediaFileRepository` - album, artist and exact-year filters

pub mod album;
pub mod artist;
pub mod media_file;

pub use album::{AlbumRepository, SqliteAlbumRepository};
pub use artist::{ArtistRepository, SqliteArtistRepository};
pub use media_file::{MediaFileRepository, SqliteMediaFileRepository};

use crate::config::CatalogConfig;
use crate::db::create_pool;
use crate::error::Result;
use crate::logging::init_logging_if_unset;
use crate::query::QueryExecutor;
use tracing::{debug, info};

/// All catalog repositories sharing one pool and query budget.
pub struct CatalogRepositories {
    pub artists: SqliteArtistRepository,
    pub albums: SqliteAlbumRepository,
    pub media_files: SqliteMediaFileRepository,
}

impl CatalogRepositories {
    /// Open the configured database (migrations applied) and build every
    /// repository over it.
    ///
    /// When `config.logging` is set its subscriber is installed first, unless
    /// the host already installed one.
    pub async fn connect(config: &CatalogConfig) -> Result<Self> {
        config.validate()?;
        if let Some(logging) = &config.logging {
            if !init_logging_if_unset(logging)? {
                debug!("Keeping the host's tracing subscriber");
            }
        }
        let pool = create_pool(config.database.clone()).await?;
        let executor = QueryExecutor::from_pool(pool, config.query);

        info!(timeout = ?config.query.timeout, "Catalog repositories ready");
        Ok(Self::from_executor(executor))
    }

    pub fn from_executor(executor: QueryExecutor) -> Self {
        Self {
            artists: SqliteArtistRepository::with_executor(executor.clone()),
            albums: SqliteAlbumRepository::with_executor(executor.clone()),
            media_files: SqliteMediaFileRepository::with_executor(executor),
        }
    }
}
