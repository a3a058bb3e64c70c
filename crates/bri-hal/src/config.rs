//! Reader configuration structures.
//!
//! Configuration-file loading and parsing belong to the host; this module
//! only defines the deserializable shape the host hands in. The reader needs
//! the device's network parameters plus an ordered list of logical read
//! points, each naming the physical antennas it groups.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use bri_protocol::DEFAULT_PORT;

/// Network and read-point configuration for one BRI reader.
///
/// # Example
///
/// ```
/// use bri_hal::ReaderConfig;
///
/// let config: ReaderConfig = serde_json::from_str(
///     r#"{
///         "host": "10.2.4.217",
///         "timeout_ms": 2000,
///         "read_points": [
///             { "name": "Dock door", "antennas": [1, 2] }
///         ]
///     }"#,
/// ).unwrap();
///
/// assert_eq!(config.port, 2189);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Reader hostname or address.
    pub host: String,

    /// Reader TCP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timeout in milliseconds for connect, write, and each line read.
    pub timeout_ms: u64,

    /// Ordered logical read points. Only the first
    /// [`MAX_READ_POINTS`](crate::MAX_READ_POINTS) are honored.
    #[serde(default)]
    pub read_points: Vec<ReadPointConfig>,
}

impl ReaderConfig {
    /// The configured timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// One logical read point: a named group of physical antennas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadPointConfig {
    /// Read point name, the unit callers request inventory for.
    pub name: String,

    /// Physical antenna identifiers belonging to this read point.
    pub antennas: Vec<u16>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
