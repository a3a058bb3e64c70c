//! Error types for the hardware-abstraction surface.
//!
//! Everything the host framework sees fails with a [`HalError`]. Client-level
//! failures are wrapped with the name of the operation that triggered them;
//! they are never retried here.

use bri_client::ClientError;

/// Result type alias for HAL operations.
pub type Result<T> = std::result::Result<T, HalError>;

/// Errors surfaced through the hardware-abstraction trait.
#[derive(Debug, thiserror::Error)]
pub enum HalError {
    /// The named logical read point is not configured.
    #[error("Read point not found: {0}")]
    ReadPointNotFound(String),

    /// Capability intentionally not implemented by this reader family.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// A device exchange failed; wraps the underlying client error with the
    /// operation that was running.
    #[error("{operation}: {source}")]
    Hardware {
        operation: String,
        #[source]
        source: ClientError,
    },

    /// Invalid read-point or reader configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested parameter does not exist.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
}

impl HalError {
    /// Create an unsupported-operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Wrap a client error with the failing operation's name.
    pub fn hardware(operation: impl Into<String>, source: ClientError) -> Self {
        Self::Hardware {
            operation: operation.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
