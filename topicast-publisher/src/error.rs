//! Publish error types.

use crate::backend::BackendError;
use crate::encoding::Encoding;
use thiserror::Error;

/// Errors returned by [`Publisher`](crate::Publisher) operations.
///
/// `Encoding` and `UnsupportedEncoding` are raised before any backend call.
/// `Backend` carries the backend's own error without reinterpretation.
#[derive(Error, Debug)]
pub enum PublishError {
    /// The value could not be converted to the configured body encoding
    #[error("failed to encode message body as {encoding}: {source}")]
    Encoding {
        /// Encoding that was attempted
        encoding: Encoding,
        /// Underlying serializer failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The configured encoding name is not a known encoding
    #[error("invalid encoding type={encoding}")]
    UnsupportedEncoding {
        /// Name found in the configuration
        encoding: String,
    },

    /// The backend failed to accept the message
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl PublishError {
    /// Whether the failure came from the backend.
    #[must_use]
    pub const fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// The backend error, if the failure came from the backend.
    #[must_use]
    pub const fn backend_error(&self) -> Option<&BackendError> {
        match self {
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;
