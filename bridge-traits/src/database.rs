//! Database Abstraction Layer
//!
//! Provides the store-facing trait used by the catalog engine. The engine only
//! reads: every request is compiled into a single statement plus positional
//! parameters and executed in one round-trip.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::database::{DatabaseAdapter, QueryValue};
//!
//! let rows = adapter
//!     .query("SELECT id FROM albums WHERE min_year >= ?", &[QueryValue::Integer(1990)])
//!     .await?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

// =============================================================================
// Query Result Types
// =============================================================================

/// Represents a single row from a database query as a map of column names to values
pub type QueryRow = std::collections::HashMap<String, QueryValue>;

/// Represents a database value that can be null, integer, real, text, or blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl QueryValue {
    /// Convert to i64 if possible
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            QueryValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to f64 if possible
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QueryValue::Real(r) => Some(*r),
            QueryValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Borrow as a string slice if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Convert to String (owned) if possible
    pub fn as_string(&self) -> Option<String> {
        self.as_str().map(str::to_owned)
    }

    /// Interpret an integer column as a SQLite-style boolean flag
    pub fn as_bool(&self) -> Option<bool> {
        self.as_i64().map(|value| value != 0)
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, QueryValue::Null)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Integer(i64::from(value))
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

// =============================================================================
// Database Adapter Trait
// =============================================================================

/// Read-only adapter the catalog engine composes its queries against.
///
/// ## Thread Safety
///
/// Implementations are shared behind `Arc` across concurrently running
/// requests and must be `Send + Sync`. The engine holds no locks of its own.
///
/// ## Cancellation
///
/// Callers bound each call with a time budget and may drop the returned
/// future when the originating request is cancelled. Implementations must
/// release any cursor or pooled connection when the future is dropped.
#[async_trait::async_trait]
pub trait DatabaseAdapter: Send + Sync {
    /// Check if the database connection is healthy
    async fn health_check(&self) -> Result<()>;

    /// Execute a SQL query and return all rows
    ///
    /// # Safety
    ///
    /// Implementations must bind `params` positionally. The engine never
    /// interpolates request input into `query`.
    async fn query(&self, query: &str, params: &[QueryValue]) -> Result<Vec<QueryRow>>;

    /// Execute a query and return exactly one row
    ///
    /// Returns an error if the statement yields no rows.
    async fn query_one(&self, query: &str, params: &[QueryValue]) -> Result<QueryRow>;
}
