//! BRI protocol constants and command rendering.
//!
//! The reader accepts one command per line. The only command this driver
//! issues is the antenna-scoped inventory read:
//!
//! ```text
//! ATTRIB ANTS=1,2,3;R
//! ```
//!
//! `ATTRIB ANTS=` restricts the read to the listed physical antennas and the
//! trailing `;R` chains the read itself into the same line.

/// Terminator line closing every reader response. Never part of the payload.
pub const TERMINATOR: &str = "OK>";

/// Leading character marking a response line as hex-encoded tag data.
pub const TAG_MARKER: char = 'H';

/// Default TCP port the reader listens on.
pub const DEFAULT_PORT: u16 = 2189;

/// Render the inventory command restricted to the given antennas.
///
/// # Examples
///
/// ```
/// use bri_protocol::inventory_command;
///
/// assert_eq!(inventory_command(&[1, 2]), "ATTRIB ANTS=1,2;R");
/// ```
pub fn inventory_command(antennas: &[u16]) -> String {
    let ants = antennas
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("ATTRIB ANTS={ants};R")
}
