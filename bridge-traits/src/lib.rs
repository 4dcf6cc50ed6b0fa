//! # Catalog Store Bridge
//!
//! Contract between the catalog query engine and the storage engine that
//! actually holds entities and annotations.
//!
//! ## Overview
//!
//! The engine never talks to a database driver directly. It compiles each
//! request into one parameterized statement and hands it to a
//! [`DatabaseAdapter`](database::DatabaseAdapter), which runs it and returns
//! loosely typed rows. Concrete adapters live next to the driver they wrap
//! (the native SQLite adapter ships with `core-catalog`).
//!
//! ## Error Handling
//!
//! Adapters report every failure as a [`BridgeError`]. The engine maps these
//! into its own taxonomy so callers can tell "the store could not run the
//! query" apart from "the store returned rows of the wrong shape".

pub mod database;
pub mod error;

pub use database::{DatabaseAdapter, QueryRow, QueryValue};
pub use error::{BridgeError, Result};
