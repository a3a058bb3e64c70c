//! BRI wire protocol support for Intermec-family RFID readers.
//!
//! BRI (Basic Reader Interface) is a line-oriented ASCII dialect carried over
//! a plain TCP socket. The reader answers every command with zero or more
//! newline-terminated lines followed by a literal `OK>` terminator line.
//! Inventory responses prefix each tag-data line with the `H` marker.
//!
//! This crate owns the protocol-level pieces only:
//!
//! - [`BriCodec`]: a Tokio codec that frames the byte stream into lines
//! - [`inventory_command`]: renders the antenna-scoped inventory command
//! - [`parse_tag_response`]: turns a raw response into a tag-ID list
//!
//! Connection management and request serialization live in `bri-client`.

pub mod codec;
pub mod command;
pub mod error;
pub mod response;

pub use codec::BriCodec;
pub use command::{DEFAULT_PORT, TAG_MARKER, TERMINATOR, inventory_command};
pub use error::{ProtocolError, Result};
pub use response::{is_terminator, parse_tag_response};
