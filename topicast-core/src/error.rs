//! Error types for the Topicast core library.

use thiserror::Error;

/// Main error type for Topicast core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration could not be read, parsed or applied
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable description
        message: String,
    },

    /// Logging subscriber could not be installed
    #[error("Logging error: {message}")]
    Logging {
        /// Human-readable description
        message: String,
    },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}

/// Result type alias for Topicast core operations.
pub type Result<T> = std::result::Result<T, Error>;
