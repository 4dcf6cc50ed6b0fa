//! Media file (track) listing repository

use crate::config::QueryConfig;
use crate::error::Result;
use crate::models::{EntityKind, FacetCounts, MediaFileMetadata};
use crate::query::{FilterParams, ItemsQuery, ListRequest, MediaFileFilter, QueryExecutor};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

/// Track listing and facet counts
#[async_trait]
pub trait MediaFileRepository: Send + Sync {
    /// List tracks matching `request`.
    ///
    /// Without a `sort` key, tracks of a single album (`albumId` set) are
    /// ordered by file name; otherwise by id.
    async fn list_items(&self, request: &ListRequest<MediaFileFilter>) -> Result<Vec<MediaFileMetadata>> {
        self.list_items_with_cancel(request, &CancellationToken::new())
            .await
    }

    async fn list_items_with_cancel(
        &self,
        request: &ListRequest<MediaFileFilter>,
        cancel: &CancellationToken,
    ) -> Result<Vec<MediaFileMetadata>>;

    /// Count tracks matching `filter`, with starred and played subsets
    async fn filter_counts(&self, filter: &MediaFileFilter) -> Result<FacetCounts> {
        self.filter_counts_with_cancel(filter, &CancellationToken::new())
            .await
    }

    async fn filter_counts_with_cancel(
        &self,
        filter: &MediaFileFilter,
        cancel: &CancellationToken,
    ) -> Result<FacetCounts>;
}

/// [`MediaFileRepository`] backed by a [`QueryExecutor`]
pub struct SqliteMediaFileRepository {
    executor: QueryExecutor,
}

impl SqliteMediaFileRepository {
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
impl MediaFileRepository for SqliteMediaFileRepository {
    async fn list_items_with_cancel(
        &self,
        request: &ListRequest<MediaFileFilter>,
        cancel: &CancellationToken,
    ) -> Result<Vec<MediaFileMetadata>> {
        self.executor
            .list_items_with_cancel(&ItemsQuery::from(request), cancel)
            .await
    }

    async fn filter_counts_with_cancel(
        &self,
        filter: &MediaFileFilter,
        cancel: &CancellationToken,
    ) -> Result<FacetCounts> {
        self.executor
            .filter_counts_with_cancel(EntityKind::MediaFile, &FilterParams::from(filter), cancel)
            .await
    }
}
