//! Store adapter implementations
//!
//! Concrete [`DatabaseAdapter`](bridge_traits::database::DatabaseAdapter)
//! implementations the executor can run compiled queries through.

pub mod sqlite_native;

pub use sqlite_native::SqliteAdapter;
