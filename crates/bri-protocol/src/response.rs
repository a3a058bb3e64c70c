//! Response classification and tag-list extraction.
//!
//! A raw response is the newline-joined payload lines of one exchange, with
//! the `OK>` terminator already removed by the client. Inventory responses
//! carry one tag per line, each line prefixed with the [`TAG_MARKER`]
//! indicating a hex-encoded identifier.

use crate::command::{TAG_MARKER, TERMINATOR};

/// Check whether a received line is the response terminator.
pub fn is_terminator(line: &str) -> bool {
    line == TERMINATOR
}

/// Extract the tag-ID list from a raw inventory response.
///
/// Returns `None` when the response does not start with the tag marker: the
/// reader answered, but with no tag data at all. This is distinct from an
/// empty tag list and callers must treat it as "no tag data present".
///
/// Otherwise every occurrence of the marker character is stripped and the
/// remainder is split on newlines. An all-marker response therefore yields a
/// one-element list containing the empty string; callers must tolerate that
/// rather than coalesce it away.
///
/// # Examples
///
/// ```
/// use bri_protocol::parse_tag_response;
///
/// assert_eq!(
///     parse_tag_response("Hf00d\nHbeef"),
///     Some(vec!["f00d".to_string(), "beef".to_string()])
/// );
/// assert_eq!(parse_tag_response(""), None);
/// ```
pub fn parse_tag_response(raw: &str) -> Option<Vec<String>> {
    if !raw.starts_with(TAG_MARKER) {
        return None;
    }

    let stripped = raw.replace(TAG_MARKER, "");

    Some(stripped.split('\n').map(str::to_string).collect())
}
