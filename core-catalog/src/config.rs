//! # Catalog Configuration
//!
//! Groups the database, query and logging settings the engine needs at
//! startup. Build with [`CatalogConfig::builder`]; `build()` validates and
//! fails fast rather than letting a bad value surface at query time.
//!
//! ```ignore
//! use core_catalog::config::CatalogConfig;
//! use std::time::Duration;
//!
//! let config = CatalogConfig::builder()
//!     .database_path("catalog.db")
//!     .query_timeout(Duration::from_secs(5))
//!     .build()?;
//! ```

use crate::db::DatabaseConfig;
use crate::error::{CatalogError, Result};
use crate::logging::{build_filter, LoggingConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Time budget applied when the caller does not choose one
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-query execution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    /// Upper bound on one store round-trip
    pub timeout: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

impl QueryConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(CatalogError::Config {
                field: "query.timeout".to_string(),
                message: "Query timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub database: DatabaseConfig,
    pub query: QueryConfig,
    /// Subscriber installed by `CatalogRepositories::connect`. `None` leaves
    /// logging to the host.
    pub logging: Option<LoggingConfig>,
}

impl CatalogConfig {
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::default()
    }

    /// Checks:
    /// - database URL is not empty
    /// - pool bounds are consistent (`1 <= min <= max`)
    /// - query timeout is non-zero
    /// - log filter parses, when logging is configured
    pub fn validate(&self) -> Result<()> {
        if self.database.database_url.trim().is_empty() {
            return Err(CatalogError::Config {
                field: "database.url".to_string(),
                message: "Database URL cannot be empty".to_string(),
            });
        }

        if self.database.min_connections == 0 {
            return Err(CatalogError::Config {
                field: "database.min_connections".to_string(),
                message: "Pool must keep at least one connection".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(CatalogError::Config {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Minimum connections ({}) exceeds maximum ({})",
                    self.database.min_connections, self.database.max_connections
                ),
            });
        }

        if let Some(logging) = &self.logging {
            build_filter(logging)?;
        }

        self.query.validate()
    }
}

/// Builder for [`CatalogConfig`]. Defaults to an in-memory database.
#[derive(Debug, Default)]
pub struct CatalogConfigBuilder {
    database_path: Option<PathBuf>,
    database: Option<DatabaseConfig>,
    query_timeout: Option<Duration>,
    logging: Option<LoggingConfig>,
}

impl CatalogConfigBuilder {
    /// Use a file-backed database at `path`
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Use an in-memory database, discarding any path set earlier
    pub fn in_memory(mut self) -> Self {
        self.database_path = None;
        self.database = Some(DatabaseConfig::in_memory());
        self
    }

    /// Use a fully specified database configuration; wins over `database_path`
    pub fn database(mut self, config: DatabaseConfig) -> Self {
        self.database = Some(config);
        self
    }

    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Install this subscriber when the repositories connect
    pub fn logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    pub fn build(self) -> Result<CatalogConfig> {
        let database = match (self.database, self.database_path) {
            (Some(config), _) => config,
            (None, Some(path)) => DatabaseConfig::new(path),
            (None, None) => DatabaseConfig::in_memory(),
        };

        let config = CatalogConfig {
            database,
            query: QueryConfig {
                timeout: self.query_timeout.unwrap_or(DEFAULT_QUERY_TIMEOUT),
            },
            logging: self.logging,
        };

        config.validate()?;
        Ok(config)
    }
}
