//! Workspace facade crate.
//!
//! Re-exports the catalog engine and its store seam so hosts can depend on
//! `catalog-workspace` alone.

pub use bridge_traits;
pub use core_catalog;

pub use core_catalog::{
    CatalogConfig, CatalogError, CatalogRepositories, EntityKind, FacetCounts, QueryConfig,
};
