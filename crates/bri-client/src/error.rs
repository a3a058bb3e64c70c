use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during BRI client operations.
///
/// A read timeout is deliberately absent: the reader's protocol has no other
/// way to say "no more data right now", so a timed-out read yields an empty
/// response instead of an error (see [`BriClient::send_command`]).
///
/// [`BriClient::send_command`]: crate::BriClient::send_command
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client has no open connection.
    #[error("Not connected to reader")]
    NotConnected,

    /// TCP connect failed outright.
    #[error("Connection to {addr} failed: {message}")]
    ConnectionFailed { addr: String, message: String },

    /// TCP connect did not complete within the configured timeout.
    #[error("Connection timeout after {0}ms")]
    ConnectionTimeout(u64),

    /// Write side did not accept the command within the configured timeout.
    #[error("Write timeout after {0}ms")]
    WriteTimeout(u64),

    /// Peer closed the connection mid-exchange.
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Line-level protocol error from the codec.
    #[error("Protocol error: {0}")]
    Protocol(#[from] bri_protocol::ProtocolError),

    /// Low-level I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
