//! Query execution against the store.
//!
//! Each call compiles one pipeline, submits it as a single statement under the
//! configured time budget and decodes the rows. A caller-supplied
//! [`CancellationToken`] aborts the wait; no rows are returned after either a
//! timeout or a cancellation.

use crate::adapters::SqliteAdapter;
use crate::config::QueryConfig;
use crate::error::{CatalogError, Result};
use crate::models::{CatalogRecord, EntityKind, FacetCounts};
use crate::query::params::{FilterParams, ItemsQuery};
use crate::query::pipeline::Pipeline;
use bridge_traits::database::DatabaseAdapter;
use bridge_traits::error::Result as BridgeResult;
use sqlx::SqlitePool;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Runs compiled catalog pipelines through a [`DatabaseAdapter`].
#[derive(Clone)]
pub struct QueryExecutor {
    adapter: Arc<dyn DatabaseAdapter>,
    config: QueryConfig,
}

impl QueryExecutor {
    pub fn new(adapter: Arc<dyn DatabaseAdapter>, config: QueryConfig) -> Self {
        Self { adapter, config }
    }

    /// Executor over the native SQLite adapter.
    pub fn from_pool(pool: SqlitePool, config: QueryConfig) -> Self {
        Self::new(Arc::new(SqliteAdapter::from_pool(pool)), config)
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// List one page of records of kind `R::KIND`.
    pub async fn list_items<R: CatalogRecord>(&self, query: &ItemsQuery) -> Result<Vec<R>> {
        self.list_items_with_cancel(query, &CancellationToken::new())
            .await
    }

    #[instrument(skip(self, query, cancel), fields(kind = %R::KIND))]
    pub async fn list_items_with_cancel<R: CatalogRecord>(
        &self,
        query: &ItemsQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<R>> {
        let pipeline = Pipeline::items(R::KIND, query);
        let compiled = pipeline.compile()?;
        debug!(
            stages = pipeline.stages().len(),
            params = compiled.params.len(),
            "Executing listing query"
        );

        let rows = self
            .bounded(
                R::KIND,
                self.adapter.query(&compiled.sql, &compiled.params),
                cancel,
            )
            .await?;

        let records = rows.iter().map(R::from_row).collect::<Result<Vec<_>>>()?;
        debug!(row_count = records.len(), "Listing query completed");
        Ok(records)
    }

    /// Facet counts for `kind` under the base filter built from `params`.
    pub async fn filter_counts(&self, kind: EntityKind, params: &FilterParams) -> Result<FacetCounts> {
        self.filter_counts_with_cancel(kind, params, &CancellationToken::new())
            .await
    }

    #[instrument(skip(self, params, cancel), fields(kind = %kind))]
    pub async fn filter_counts_with_cancel(
        &self,
        kind: EntityKind,
        params: &FilterParams,
        cancel: &CancellationToken,
    ) -> Result<FacetCounts> {
        let compiled = Pipeline::facets(kind, params).compile()?;
        debug!(params = compiled.params.len(), "Executing facet query");

        let row = self
            .bounded(
                kind,
                self.adapter.query_one(&compiled.sql, &compiled.params),
                cancel,
            )
            .await?;
        FacetCounts::from_row(&row)
    }

    async fn bounded<T, F>(&self, kind: EntityKind, future: F, cancel: &CancellationToken) -> Result<T>
    where
        F: Future<Output = BridgeResult<T>>,
    {
        let budget = self.config.timeout;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(%kind, "Catalog query cancelled");
                Err(CatalogError::Cancelled)
            }
            outcome = tokio::time::timeout(budget, future) => match outcome {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => {
                    warn!(%kind, error = %e, "Catalog query failed");
                    Err(CatalogError::Store(e))
                }
                Err(_) => {
                    warn!(%kind, ?budget, "Catalog query timed out");
                    Err(CatalogError::Timeout { budget })
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlbumMetadata, ArtistMetadata};
    use async_trait::async_trait;
    use bridge_traits::database::{QueryRow, QueryValue};
    use bridge_traits::error::BridgeError;
    use mockall::mock;
    use std::time::Duration;

    mock! {
        pub Store {}

        #[async_trait]
        impl DatabaseAdapter for Store {
            async fn health_check(&self) -> BridgeResult<()>;
            async fn query(&self, query: &str, params: &[QueryValue]) -> BridgeResult<Vec<QueryRow>>;
            async fn query_one(&self, query: &str, params: &[QueryValue]) -> BridgeResult<QueryRow>;
        }
    }

    /// Store that never answers within a test's patience.
    struct StalledStore;

    #[async_trait]
    impl DatabaseAdapter for StalledStore {
        async fn health_check(&self) -> BridgeResult<()> {
            Ok(())
        }

        async fn query(&self, _query: &str, _params: &[QueryValue]) -> BridgeResult<Vec<QueryRow>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }

        async fn query_one(&self, _query: &str, _params: &[QueryValue]) -> BridgeResult<QueryRow> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(QueryRow::new())
        }
    }

    fn executor(store: impl DatabaseAdapter + 'static, timeout: Duration) -> QueryExecutor {
        QueryExecutor::new(Arc::new(store), QueryConfig { timeout })
    }

    fn artist_row(id: &str) -> QueryRow {
        let mut row = QueryRow::new();
        row.insert("id".into(), QueryValue::from(id));
        row.insert("name".into(), QueryValue::from("Name"));
        row.insert("genre".into(), QueryValue::Null);
        for column in ["album_count", "song_count", "size", "created_at", "updated_at"] {
            row.insert(column.into(), QueryValue::Integer(0));
        }
        for column in ["play_count", "rating", "starred"] {
            row.insert(column.into(), QueryValue::Integer(0));
        }
        row.insert("play_date".into(), QueryValue::Null);
        row.insert("starred_at".into(), QueryValue::Null);
        row
    }

    #[tokio::test]
    async fn test_listing_submits_one_parameterized_statement() {
        let mut store = MockStore::new();
        store
            .expect_query()
            .withf(|sql, params| {
                sql.contains("LIMIT ?")
                    && !sql.contains("Beat")
                    && params.contains(&QueryValue::Text("%Beat%".into()))
            })
            .times(1)
            .returning(|_, _| Ok(vec![artist_row("ar-2"), artist_row("ar-1")]));

        let query = ItemsQuery {
            start: Some("0".into()),
            end: Some("10".into()),
            params: FilterParams {
                search: Some("Beat".into()),
                ..FilterParams::default()
            },
            ..ItemsQuery::default()
        };
        let artists: Vec<ArtistMetadata> = executor(store, Duration::from_secs(1))
            .list_items(&query)
            .await
            .unwrap();

        let ids: Vec<_> = artists.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["ar-2", "ar-1"], "store order is preserved");
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced() {
        let mut store = MockStore::new();
        store
            .expect_query()
            .returning(|_, _| Err(BridgeError::DatabaseError("connection reset".into())));

        let err = executor(store, Duration::from_secs(1))
            .list_items::<AlbumMetadata>(&ItemsQuery::default())
            .await
            .unwrap_err();
        assert!(err.is_store_failure());
        assert!(!err.is_decode_failure());
    }

    #[tokio::test]
    async fn test_mismatched_rows_are_decode_failures() {
        let mut store = MockStore::new();
        store.expect_query().returning(|_, _| {
            let mut row = QueryRow::new();
            row.insert("id".into(), QueryValue::Integer(7));
            Ok(vec![row])
        });

        let err = executor(store, Duration::from_secs(1))
            .list_items::<ArtistMetadata>(&ItemsQuery::default())
            .await
            .unwrap_err();
        assert!(err.is_decode_failure());
    }

    #[tokio::test]
    async fn test_facet_counts_decode_single_row() {
        let mut store = MockStore::new();
        store
            .expect_query_one()
            .withf(|sql, _| sql.starts_with("SELECT COUNT(*) AS total"))
            .returning(|_, _| {
                let mut row = QueryRow::new();
                row.insert("total".into(), QueryValue::Integer(3));
                row.insert("starred".into(), QueryValue::Integer(1));
                row.insert("recent_play".into(), QueryValue::Integer(2));
                Ok(row)
            });

        let counts = executor(store, Duration::from_secs(1))
            .filter_counts(EntityKind::Album, &FilterParams::default())
            .await
            .unwrap();
        assert_eq!(
            counts,
            FacetCounts {
                total: 3,
                starred: 1,
                recent_play: 2
            }
        );
    }

    #[tokio::test]
    async fn test_time_budget_is_enforced() {
        let err = executor(StalledStore, Duration::from_millis(20))
            .list_items::<ArtistMetadata>(&ItemsQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Timeout { budget } if budget == Duration::from_millis(20)));
        assert!(err.is_store_failure());
    }

    #[tokio::test]
    async fn test_cancelled_query_returns_no_rows() {
        let token = CancellationToken::new();
        token.cancel();

        let err = executor(StalledStore, Duration::from_secs(5))
            .filter_counts_with_cancel(EntityKind::MediaFile, &FilterParams::default(), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_while_waiting() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let err = executor(StalledStore, Duration::from_secs(5))
            .list_items_with_cancel::<ArtistMetadata>(&ItemsQuery::default(), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Cancelled));
    }
}
