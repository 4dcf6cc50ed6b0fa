//! Album listing repository

use crate::config::QueryConfig;
use crate::error::Result;
use crate::models::{AlbumMetadata, EntityKind, FacetCounts};
use crate::query::{AlbumFilter, FilterParams, ItemsQuery, ListRequest, QueryExecutor};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

/// Album listing and facet counts
#[async_trait]
pub trait AlbumRepository: Send + Sync {
    /// List albums matching `request`
    ///
    /// # Arguments
    /// * `request` - Page window, sort and album filters (`artistId`,
    ///   `minYear`/`maxYear`, `search`, `starred`)
    ///
    /// # Returns
    /// Albums in the requested order, each with its annotation. Malformed
    /// optional parameters are ignored rather than rejected.
    async fn list_items(&self, request: &ListRequest<AlbumFilter>) -> Result<Vec<AlbumMetadata>> {
        self.list_items_with_cancel(request, &CancellationToken::new())
            .await
    }

    async fn list_items_with_cancel(
        &self,
        request: &ListRequest<AlbumFilter>,
        cancel: &CancellationToken,
    ) -> Result<Vec<AlbumMetadata>>;

    /// Count albums matching `filter`
    ///
    /// # Returns
    /// `{total, starred, recent_play}` over the same filtered set
    async fn filter_counts(&self, filter: &AlbumFilter) -> Result<FacetCounts> {
        self.filter_counts_with_cancel(filter, &CancellationToken::new())
            .await
    }

    async fn filter_counts_with_cancel(
        &self,
        filter: &AlbumFilter,
        cancel: &CancellationToken,
    ) -> Result<FacetCounts>;
}

/// SQLite implementation of [`AlbumRepository`]
pub struct SqliteAlbumRepository {
    executor: QueryExecutor,
}

impl SqliteAlbumRepository {
    /// Create a repository with the default 10 second query budget
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_config(pool, QueryConfig::default())
    }

    pub fn with_config(pool: SqlitePool, config: QueryConfig) -> Self {
        Self::with_executor(QueryExecutor::from_pool(pool, config))
    }

    pub fn with_executor(executor: QueryExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl AlbumRepository for SqliteAlbumRepository {
    async fn list_items_with_cancel(
        &self,
        request: &ListRequest<AlbumFilter>,
        cancel: &CancellationToken,
    ) -> Result<Vec<AlbumMetadata>> {
        self.executor
            .list_items_with_cancel(&ItemsQuery::from(request), cancel)
            .await
    }

    async fn filter_counts_with_cancel(
        &self,
        filter: &AlbumFilter,
        cancel: &CancellationToken,
    ) -> Result<FacetCounts> {
        self.executor
            .filter_counts_with_cancel(EntityKind::Album, &FilterParams::from(filter), cancel)
            .await
    }
}
