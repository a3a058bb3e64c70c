//! Serialized TCP client for the BRI line protocol.
//!
//! This crate owns exactly one concern: a reliable, single-flight
//! command/response exchange with one reader over one long-lived TCP
//! connection. The reader's dialect is strictly half-duplex with no request
//! identifiers, so responses can only be correlated with requests by never
//! having two commands on the wire at once. [`BriClient`] enforces that with
//! a mutex over the connection.
//!
//! Inventory assembly, read-point mapping, and the hardware-abstraction
//! surface live in `bri-hal`.

pub mod client;
pub mod error;

pub use client::{BriClient, BriClientConfig};
pub use error::{ClientError, Result};
