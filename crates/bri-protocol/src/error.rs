use thiserror::Error;

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while framing or parsing BRI lines.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A line exceeded the codec's maximum length before a newline arrived.
    #[error("Line exceeds maximum length of {max} bytes")]
    LineTooLong { max: usize },

    /// A received line was not valid UTF-8.
    #[error("Invalid UTF-8 in response line")]
    InvalidUtf8,

    /// Low-level I/O error surfaced through the codec.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
