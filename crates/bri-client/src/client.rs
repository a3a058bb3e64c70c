//! TCP client for BRI command/response exchange.
//!
//! [`BriClient`] owns one long-lived TCP connection to a reader and
//! serializes all command traffic over it. The reader answers each command
//! with zero or more lines followed by the `OK>` terminator, and it sends an
//! unsolicited banner right after accepting a connection, which [`connect`]
//! drains before handing the client out.
//!
//! # Serialization
//!
//! BRI carries no request identifiers, so the only way to correlate a
//! response with its command is to guarantee exactly one round-trip is in
//! flight at a time. A `tokio::sync::Mutex` over the connection enforces
//! that: a second caller suspends until the first round-trip completes, and
//! [`reconnect`] takes the same mutex so a reset can never tear the
//! connection down underneath an outstanding command.
//!
//! # Timeouts
//!
//! A read that produces no line within the configured window is not an
//! error. The device has no other way to signal "nothing more to say", so
//! [`send_command`] returns an empty response in that case and discards any
//! partial lines received before the window closed.
//!
//! [`connect`]: BriClient::connect
//! [`reconnect`]: BriClient::reconnect
//! [`send_command`]: BriClient::send_command

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::codec::Framed;
use tracing::{debug, error, info, trace, warn};

use bri_protocol::{BriCodec, DEFAULT_PORT, is_terminator, parse_tag_response};

use crate::error::{ClientError, Result};

/// How long to wait for flush/shutdown during close before giving up.
const CLOSE_TIMEOUT: Duration = Duration::from_millis(500);

/// Configuration for a [`BriClient`].
#[derive(Debug, Clone)]
pub struct BriClientConfig {
    /// Reader hostname or address.
    pub host: String,

    /// Reader TCP port.
    pub port: u16,

    /// Timeout applied to connect, write, and each line read.
    pub timeout: Duration,
}

impl Default for BriClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            timeout: Duration::from_millis(2000),
        }
    }
}

/// Serialized line-protocol client for one BRI reader.
///
/// # Connection lifecycle
///
/// 1. Create with [`new`](Self::new) (disconnected)
/// 2. [`connect`](Self::connect) — opens the socket and drains the banner
/// 3. Exchange commands with [`send_command`](Self::send_command) /
///    [`send_inventory_request`](Self::send_inventory_request)
/// 4. [`close`](Self::close), or [`reconnect`](Self::reconnect) to cycle the
///    connection in place
///
/// All methods take `&self`; the client is shared behind an `Arc` by the
/// orchestrator and callers on different tasks are serialized internally.
pub struct BriClient {
    host: String,
    port: u16,
    timeout: Duration,

    /// The framed connection. `None` while disconnected. The mutex is the
    /// single-flight guarantee: one command/response round-trip at a time.
    conn: Mutex<Option<Framed<TcpStream, BriCodec>>>,

    /// Connectivity flag readable without touching the connection mutex.
    connected: AtomicBool,
}

impl BriClient {
    /// Create a new client. No connection is opened until
    /// [`connect`](Self::connect) is called.
    pub fn new(config: BriClientConfig) -> Self {
        debug!("Creating BRI client for {}:{}", config.host, config.port);

        Self {
            host: config.host,
            port: config.port,
            timeout: config.timeout,
            conn: Mutex::new(None),
            connected: AtomicBool::new(false),
        }
    }

    /// Reader address as `host:port`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Open the TCP connection and drain the reader's connect banner.
    ///
    /// The reader emits version/status lines as soon as the connection is
    /// accepted; one response read swallows them so the first command sees a
    /// clean stream. A banner read that times out simply means the reader
    /// sent nothing, which is fine.
    ///
    /// # Errors
    ///
    /// [`ClientError::ConnectionFailed`] if the socket cannot be opened,
    /// [`ClientError::ConnectionTimeout`] if the connect attempt exceeds the
    /// configured timeout.
    pub async fn connect(&self) -> Result<()> {
        let mut guard = self.conn.lock().await;
        self.connect_locked(&mut guard).await
    }

    /// Tear down any existing connection and open a fresh one, holding the
    /// command mutex throughout so no command can interleave with the reset.
    pub async fn reconnect(&self) -> Result<()> {
        let mut guard = self.conn.lock().await;

        if let Some(framed) = guard.take() {
            self.connected.store(false, Ordering::SeqCst);
            Self::teardown(framed).await;
        }

        self.connect_locked(&mut guard).await
    }

    async fn connect_locked(
        &self,
        guard: &mut Option<Framed<TcpStream, BriCodec>>,
    ) -> Result<()> {
        info!("Connecting to reader at {}:{}", self.host, self.port);

        let connect = TcpStream::connect((self.host.as_str(), self.port));
        let stream = match tokio::time::timeout(self.timeout, connect).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                error!("Connection to {}:{} failed: {}", self.host, self.port, e);
                return Err(ClientError::ConnectionFailed {
                    addr: self.addr(),
                    message: e.to_string(),
                });
            }
            Err(_) => {
                warn!("Connection timeout after {}ms", self.timeout.as_millis());
                return Err(ClientError::ConnectionTimeout(
                    self.timeout.as_millis() as u64
                ));
            }
        };

        // Command/response latency matters more than throughput here;
        // without this, Nagle batching can eat most of a short poll window.
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }

        let mut framed = Framed::new(stream, BriCodec::new());

        // Swallow whatever banner the reader pushes on connect.
        let banner = Self::read_response(&mut framed, self.timeout).await?;
        if !banner.is_empty() {
            debug!("Reader banner: {}", banner.replace('\n', " | "));
        }

        *guard = Some(framed);
        self.connected.store(true, Ordering::SeqCst);

        info!("Connected to reader at {}:{}", self.host, self.port);
        Ok(())
    }

    /// Send one command line and return the response accumulated up to (and
    /// excluding) the `OK>` terminator, lines joined with `\n`.
    ///
    /// A read timeout returns `Ok` with an empty string — the reader had
    /// nothing more to say within the window. Partial lines received before
    /// the timeout are discarded with the rest of the exchange.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotConnected`] without an open connection; any I/O or
    /// framing failure mid-exchange, after which the connection is dropped
    /// and the client reports disconnected.
    pub async fn send_command(&self, command: &str) -> Result<String> {
        let mut guard = self.conn.lock().await;
        let framed = guard.as_mut().ok_or(ClientError::NotConnected)?;

        debug!("Command sent: {}", command);

        match tokio::time::timeout(self.timeout, framed.send(command.to_string())).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!("Failed to send command: {}", e);
                self.drop_connection(&mut guard);
                return Err(e.into());
            }
            Err(_) => {
                warn!("Write timeout after {}ms", self.timeout.as_millis());
                self.drop_connection(&mut guard);
                return Err(ClientError::WriteTimeout(self.timeout.as_millis() as u64));
            }
        }

        match Self::read_response(framed, self.timeout).await {
            Ok(response) => {
                trace!("Response ({} bytes)", response.len());
                Ok(response)
            }
            Err(e) => {
                error!("Failed to read response: {}", e);
                self.drop_connection(&mut guard);
                Err(e)
            }
        }
    }

    /// Send an inventory command and parse the tag-ID list out of the
    /// response.
    ///
    /// Returns `Ok(None)` when the reader responded without the tag-data
    /// marker — no tag data present, as opposed to zero tags.
    pub async fn send_inventory_request(&self, command: &str) -> Result<Option<Vec<String>>> {
        let response = self.send_command(command).await?;
        Ok(parse_tag_response(&response))
    }

    /// Whether the client currently holds an open connection. No I/O is
    /// performed; this reads a flag maintained by connect/close and by
    /// failure handling in [`send_command`](Self::send_command).
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Close the connection. Idempotent; after closing, commands fail with
    /// [`ClientError::NotConnected`] until [`connect`](Self::connect) or
    /// [`reconnect`](Self::reconnect) is called.
    pub async fn close(&self) {
        let mut guard = self.conn.lock().await;

        if let Some(framed) = guard.take() {
            info!("Closing connection to {}", self.addr());
            self.connected.store(false, Ordering::SeqCst);
            Self::teardown(framed).await;
        }
    }

    /// Read lines until the terminator, joining them with `\n`.
    ///
    /// Timeout returns an empty response; EOF is a lost connection.
    async fn read_response(
        framed: &mut Framed<TcpStream, BriCodec>,
        timeout: Duration,
    ) -> Result<String> {
        let mut lines: Vec<String> = Vec::new();

        loop {
            match tokio::time::timeout(timeout, framed.next()).await {
                Ok(Some(Ok(line))) => {
                    if is_terminator(&line) {
                        return Ok(lines.join("\n"));
                    }
                    lines.push(line);
                }
                Ok(Some(Err(e))) => return Err(e.into()),
                Ok(None) => {
                    return Err(ClientError::ConnectionLost(
                        "Reader closed connection".to_string(),
                    ));
                }
                Err(_) => {
                    warn!("Timeout of {}ms in read operation", timeout.as_millis());
                    return Ok(String::new());
                }
            }
        }
    }

    /// Drop the connection after a mid-exchange failure. The socket is
    /// presumed unusable; no graceful shutdown is attempted.
    fn drop_connection(&self, guard: &mut Option<Framed<TcpStream, BriCodec>>) {
        self.connected.store(false, Ordering::SeqCst);
        *guard = None;
    }

    /// Graceful teardown with bounded flush and shutdown.
    async fn teardown(mut framed: Framed<TcpStream, BriCodec>) {
        match tokio::time::timeout(CLOSE_TIMEOUT, framed.flush()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Error flushing during close: {}", e),
            Err(_) => warn!("Flush timeout during close ({}ms)", CLOSE_TIMEOUT.as_millis()),
        }

        let mut stream = framed.into_inner();
        match tokio::time::timeout(CLOSE_TIMEOUT, stream.shutdown()).await {
            Ok(Ok(())) => debug!("Connection shut down"),
            Ok(Err(e)) => warn!("Error during shutdown: {}", e),
            Err(_) => warn!(
                "Shutdown timeout during close ({}ms)",
                CLOSE_TIMEOUT.as_millis()
            ),
        }
    }
}

impl std::fmt::Debug for BriClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BriClient")
            .field("addr", &self.addr())
            .field("timeout", &self.timeout)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Drop for BriClient {
    fn drop(&mut self) {
        if self.is_connected() {
            debug!("BriClient dropped while connected - connection will be closed");
        }
    }
}
