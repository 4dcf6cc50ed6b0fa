//! # Catalog Query Engine
//!
//! Builds and runs listing and facet queries over artists, albums and tracks.
//!
//! ## Pipeline
//!
//! Every request is assembled into one ordered [`Pipeline`]:
//!
//! 1. **Join**: entity left-outer-joined with its annotation, fields defaulted
//! 2. **Filter**: base filter from request parameters ([`FilterBuilder`])
//! 3. **ConditionalFilter**: played-only restriction for play-history sorts
//! 4. **Sort**: allow-listed field plus id tie-break ([`SortResolver`])
//! 5. **Skip / Limit**: page window when the bounds are valid ([`Paginator`])
//!
//! Facet counts replace steps 3-5 with a single aggregate stage
//! ([`FacetCounter`]). The pipeline compiles to one parameterized statement,
//! and [`QueryExecutor`] submits it once per call.
//!
//! Per-kind behaviour (search fields, sort allow-list, kind-specific filters)
//! lives in static [`KindProfile`] tables rather than per-kind code.

pub mod annotation;
pub mod executor;
pub mod facet;
pub mod filter;
pub mod pagination;
pub mod params;
pub mod pipeline;
pub mod profile;
pub mod sort;

pub use annotation::{AnnotationJoin, AnnotationJoiner};
pub use executor::QueryExecutor;
pub use facet::{FacetCounter, FacetSpec};
pub use filter::{Filter, FilterBuilder, Predicate};
pub use pagination::{PageWindow, Paginator};
pub use params::{
    AlbumFilter, ArtistFilter, FilterParams, ItemsQuery, ListRequest, MediaFileFilter,
};
pub use pipeline::{CompiledQuery, Pipeline, Stage};
pub use profile::KindProfile;
pub use sort::{SortDirection, SortPlan, SortResolver, SortSpec};
