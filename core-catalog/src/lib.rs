//! # Catalog Query Engine
//!
//! Read-side query engine for a music catalog: paginated, sorted, filtered
//! listings of artists, albums and tracks joined with per-user annotations
//! (play count, last play, rating, starred), plus facet counts over the same
//! filtered sets.
//!
//! ## Overview
//!
//! - [`query`]: pipeline assembly (join, filter, sort, page, facet) and the
//!   executor that runs it as one parameterized statement
//! - [`repositories`]: per-kind `list_items` / `filter_counts` surface
//! - [`adapters`]: `sqlx` implementation of the store seam
//! - [`db`]: SQLite pool, embedded migrations and health check
//! - [`config`] and [`logging`]: startup configuration and `tracing` setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_catalog::config::CatalogConfig;
//! use core_catalog::query::{AlbumFilter, ListRequest};
//! use core_catalog::repositories::{AlbumRepository, CatalogRepositories};
//!
//! let catalog = CatalogRepositories::connect(&CatalogConfig::builder().database_path("catalog.db").build()?).await?;
//! let page = catalog
//!     .albums
//!     .list_items(&ListRequest::new(AlbumFilter::default()).range("0", "20").sort("name", "asc"))
//!     .await?;
//! ```

pub mod adapters;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod repositories;

#[cfg(test)]
mod fixtures;

pub use config::{CatalogConfig, QueryConfig};
pub use error::{CatalogError, Result};
pub use models::{
    AlbumMetadata, Annotation, ArtistMetadata, CatalogRecord, EntityKind, FacetCounts,
    MediaFileMetadata,
};
pub use query::QueryExecutor;
pub use repositories::CatalogRepositories;
