//! Structured logging setup.
//!
//! Library code only emits `tracing` events. Binaries and tests that want to
//! see them call [`init_logging`] once at startup.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Install a subscriber at all
    pub enabled: bool,

    /// Minimum level, used when `RUST_LOG` is not set
    pub level: LogLevel,

    /// Output format
    pub format: LogFormat,

    /// Include the event target (module path) in output
    pub target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enabled: true, level: LogLevel::Info, format: LogFormat::Text, target: true }
    }
}

/// Log levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-message detail
    Trace,
    /// Diagnostic output
    Debug,
    /// Normal operation
    Info,
    /// Recoverable problems
    Warn,
    /// Failures only
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Log output formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Install the global `tracing` subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over `config.level` when it is set.
///
/// # Errors
/// Returns [`Error::Logging`] if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Text => {
            tracing_subscriber::fmt::layer().with_target(config.target).boxed()
        },
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(config.target)
            .with_current_span(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .map_err(|e| Error::Logging { message: e.to_string() })?;

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}
