//! Tokio codec framing the BRI byte stream into lines.
//!
//! The reader speaks newline-terminated ASCII with no length prefix, so the
//! only framing unit is the line. [`BriCodec`] implements [`Decoder`] and
//! [`Encoder<String>`] for use with `tokio_util::codec::Framed`:
//!
//! ```text
//! TCP stream -> Decoder -> one String per received line
//! command String -> Encoder -> line + '\n' on the wire
//! ```
//!
//! Some firmware revisions terminate lines with CRLF; a trailing `\r` is
//! stripped during decode. Lines that grow past the configured maximum are
//! rejected with [`ProtocolError::LineTooLong`] instead of buffering without
//! bound.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ProtocolError;

/// Default maximum line length in bytes (8 KB).
///
/// Tag-data lines are a few dozen bytes; banner and error lines are shorter
/// still. Anything past this limit is a protocol violation or a misbehaving
/// peer.
const DEFAULT_MAX_LINE_LEN: usize = 8 * 1024;

/// Line codec for the BRI dialect.
#[derive(Debug)]
pub struct BriCodec {
    /// Maximum accepted line length in bytes.
    max_line_len: usize,

    /// Scan position into the undecoded buffer, so repeated `decode` calls
    /// do not rescan bytes already known to contain no newline.
    next_index: usize,
}

impl BriCodec {
    /// Create a codec with the default maximum line length.
    pub fn new() -> Self {
        Self::with_max_line_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_line_len(max_line_len: usize) -> Self {
        Self {
            max_line_len,
            next_index: 0,
        }
    }
}

impl Default for BriCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for BriCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        let newline_pos = src[self.next_index..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|pos| self.next_index + pos);

        match newline_pos {
            Some(pos) => {
                self.next_index = 0;

                let mut line = src.split_to(pos + 1);
                line.truncate(pos);
                if line.last() == Some(&b'\r') {
                    line.truncate(line.len() - 1);
                }

                let line = std::str::from_utf8(&line).map_err(|_| ProtocolError::InvalidUtf8)?;
                Ok(Some(line.to_string()))
            }
            None if src.len() > self.max_line_len => Err(ProtocolError::LineTooLong {
                max: self.max_line_len,
            }),
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }
}

impl Encoder<String> for BriCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
