//! # Logging & Tracing
//!
//! Structured logging for the catalog engine built on `tracing`.
//!
//! The engine itself only emits events (query assembly at `debug`, store
//! failures and timeouts at `warn`). Hosts that do not install their own
//! subscriber can call [`init_logging`] once at startup, or set
//! `CatalogConfig::logging` and let `CatalogRepositories::connect` install it
//! through [`init_logging_if_unset`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_catalog::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
//!
//! init_logging(
//!     LoggingConfig::default()
//!         .with_format(LogFormat::Json)
//!         .with_level(LogLevel::Debug),
//! )?;
//! ```

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::io;
use tracing::debug;
use tracing_subscriber::{
    filter::EnvFilter,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable pretty format with colors
    Pretty,
    /// Structured JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Json;
    }
}

/// Minimum level for the engine's own crates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Custom filter string (e.g., "core_catalog=trace,sqlx=info")
    pub filter: Option<String>,
    /// Emit span open/close events and span context
    pub enable_spans: bool,
    /// Display target module in logs
    pub display_target: bool,
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            enable_spans: true,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }
}

/// Initialize the global subscriber.
///
/// # Errors
///
/// Returns [`CatalogError::Config`] when the filter does not parse or a
/// global subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;

    install(&config, filter).map_err(|e| CatalogError::Config {
        field: "logging".to_string(),
        message: format!("Failed to initialize logging: {}", e),
    })
}

/// Install the global subscriber unless one is already set.
///
/// Returns `Ok(false)` when another subscriber was installed first. A bad
/// filter is still an error.
pub fn init_logging_if_unset(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(config)?;

    match install(config, filter) {
        Ok(()) => Ok(true),
        Err(e) => {
            debug!(error = %e, "Global subscriber already installed, keeping it");
            Ok(false)
        }
    }
}

fn install(
    config: &LoggingConfig,
    filter: EnvFilter,
) -> std::result::Result<(), TryInitError> {
    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_target(config.display_target)
                .with_thread_ids(config.display_thread_info)
                .with_thread_names(config.display_thread_info)
                .with_span_events(span_events(config))
                .with_writer(io::stdout);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(config.enable_spans)
                .with_span_list(config.enable_spans)
                .with_target(config.display_target)
                .with_thread_ids(config.display_thread_info)
                .with_thread_names(config.display_thread_info)
                .with_writer(io::stdout);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        LogFormat::Compact => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_target(config.display_target)
                .with_thread_ids(config.display_thread_info)
                .with_thread_names(config.display_thread_info)
                .with_span_events(span_events(config))
                .with_writer(io::stdout);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
    }
}

fn span_events(config: &LoggingConfig) -> tracing_subscriber::fmt::format::FmtSpan {
    if config.enable_spans {
        tracing_subscriber::fmt::format::FmtSpan::CLOSE
    } else {
        tracing_subscriber::fmt::format::FmtSpan::NONE
    }
}

pub(crate) fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let filter_string = match &config.filter {
        Some(custom) => custom.clone(),
        None => {
            let level = config.level.as_directive();
            // Our crates at the configured level, dependencies at warn
            format!("core_catalog={level},bridge_traits={level},catalog_workspace={level},sqlx=warn")
        }
    };

    EnvFilter::try_new(&filter_string).map_err(|e| CatalogError::Config {
        field: "logging.filter".to_string(),
        message: format!("Invalid log filter '{}': {}", filter_string, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Json)
            .with_level(LogLevel::Debug)
            .with_filter("core_catalog=trace")
            .with_spans(false)
            .with_target(false)
            .with_thread_info(true);

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.filter.as_deref(), Some("core_catalog=trace"));
        assert!(!config.enable_spans);
        assert!(!config.display_target);
        assert!(config.display_thread_info);
    }

    #[test]
    fn test_default_filter_quiets_sqlx() {
        let filter = build_filter(&LoggingConfig::default().with_level(LogLevel::Trace)).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("core_catalog=trace"));
        assert!(rendered.contains("sqlx=warn"));
    }

    #[test]
    fn test_install_tolerates_existing_subscriber() {
        let config = LoggingConfig::default().with_format(LogFormat::Compact);
        let _ = init_logging_if_unset(&config).unwrap();
        assert!(!init_logging_if_unset(&config).unwrap());
        assert!(init_logging(config).is_err());
    }

    #[test]
    fn test_install_rejects_bad_filter() {
        let config = LoggingConfig::default().with_filter("core_catalog=notalevel");
        assert!(matches!(
            init_logging_if_unset(&config),
            Err(CatalogError::Config { field, .. }) if field == "logging.filter"
        ));
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let err = build_filter(&LoggingConfig::default().with_filter("core_catalog=notalevel")).unwrap_err();
        assert!(matches!(err, CatalogError::Config { .. }));
    }
}
