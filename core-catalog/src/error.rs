use bridge_traits::error::BridgeError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Store execution failed: {0}")]
    Store(#[from] BridgeError),

    #[error("Query exceeded time budget of {budget:?}")]
    Timeout { budget: Duration },

    #[error("Query cancelled by caller")]
    Cancelled,

    #[error("Malformed query pipeline: {0}")]
    MalformedQuery(String),

    #[error("Decode error: {column} - {message}")]
    Decode { column: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Invalid configuration: {field} - {message}")]
    Config { field: String, message: String },
}

impl CatalogError {
    /// The composed query could not be run (connectivity, time budget,
    /// cancellation or a pipeline the store cannot execute).
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            CatalogError::Store(_)
                | CatalogError::Timeout { .. }
                | CatalogError::Cancelled
                | CatalogError::MalformedQuery(_)
                | CatalogError::Database(_)
        )
    }

    /// The store answered, but with rows that do not match the record shape.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, CatalogError::Decode { .. })
    }

    pub(crate) fn decode(column: &str, message: impl Into<String>) -> Self {
        CatalogError::Decode {
            column: column.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_decode_failures_are_distinct() {
        let store = CatalogError::Store(BridgeError::DatabaseError("down".into()));
        let timeout = CatalogError::Timeout {
            budget: Duration::from_secs(10),
        };
        let decode = CatalogError::decode("id", "missing column in result set");

        assert!(store.is_store_failure());
        assert!(timeout.is_store_failure());
        assert!(CatalogError::Cancelled.is_store_failure());
        assert!(!decode.is_store_failure());
        assert!(decode.is_decode_failure());
        assert!(!store.is_decode_failure());
    }

    #[test]
    fn decode_error_names_the_column() {
        let err = CatalogError::decode("play_count", "expected integer");
        assert_eq!(err.to_string(), "Decode error: play_count - expected integer");
    }
}
