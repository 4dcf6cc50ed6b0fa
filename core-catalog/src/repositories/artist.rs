//! Artist listing repository

use crate::config::QueryConfig;
use crate::error::Result;
use crate::models::{ArtistMetadata, EntityKind, FacetCounts};
use crate::query::{ArtistFilter, FilterParams, ItemsQuery, ListRequest, QueryExecutor};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

/// Artist listing and facet counts. Artists only filter on `search` and
/// `starred`.
#[async_trait]
pub trait ArtistRepository: Send + Sync {
    async fn list_items(&self, request: &ListRequest<ArtistFilter>) -> Result<Vec<ArtistMetadata>> {
        self.list_items_with_cancel(request, &CancellationToken::new())
            .await
    }

    async fn list_items_with_cancel(
        &self,
        request: &ListRequest<ArtistFilter>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ArtistMetadata>>;

    async fn filter_counts(&self, filter: &ArtistFilter) -> Result<FacetCounts> {
        self.filter_counts_with_cancel(filter, &CancellationToken::new())
            .await
    }

    async fn filter_counts_with_cancel(
        &self,
        filter: &ArtistFilter,
        cancel: &CancellationToken,
    ) -> Result<FacetCounts>;
}

pub struct SqliteArtistRepository {
    executor: QueryExecutor,
}

impl SqliteArtistRepository {
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
impl ArtistRepository for SqliteArtistRepository {
    async fn list_items_with_cancel(
        &self,
        request: &ListRequest<ArtistFilter>,
        cancel: &CancellationToken,
    ) -> Result<Vec<ArtistMetadata>> {
        self.executor
            .list_items_with_cancel(&ItemsQuery::from(request), cancel)
            .await
    }

    async fn filter_counts_with_cancel(
        &self,
        filter: &ArtistFilter,
        cancel: &CancellationToken,
    ) -> Result<FacetCounts> {
        self.executor
            .filter_counts_with_cancel(EntityKind::Artist, &FilterParams::from(filter), cancel)
            .await
    }
}
