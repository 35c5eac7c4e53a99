//! Replies produced for an inbound line.

use crate::collaborator::{CollaboratorError, CollaboratorResult};

/// Acknowledgment sent when an action succeeds without output.
pub const DONE: &str = "Done.";

/// Default cap on reply text, in bytes.
pub const DEFAULT_MAX_REPLY_BYTES: usize = 4096;

/// What to send back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A text message
    Text(String),
    /// An image attachment (encoded bytes)
    Image(Vec<u8>),
    /// Nothing is sent
    Silent,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }

    /// Returns the text of a text reply.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Converts the output of a textual action into a reply.
    ///
    /// Empty output is success and becomes [`DONE`]; errors become their
    /// message. Either way the text is capped at `max_bytes`.
    pub fn from_output(result: CollaboratorResult<String>, max_bytes: usize) -> Self {
        match result {
            Ok(output) if output.trim().is_empty() => Reply::text(DONE),
            Ok(output) => Reply::text(truncate_utf8(&output, max_bytes)),
            Err(e) => Reply::from_error(&e, max_bytes),
        }
    }

    /// Converts the output of a capture action into a reply.
    pub fn from_image(result: CollaboratorResult<Vec<u8>>, max_bytes: usize) -> Self {
        match result {
            Ok(bytes) => Reply::Image(bytes),
            Err(e) => Reply::from_error(&e, max_bytes),
        }
    }

    pub fn from_error(err: &CollaboratorError, max_bytes: usize) -> Self {
        Reply::text(truncate_utf8(&err.to_string(), max_bytes))
    }
}

/// Truncates `text` to at most `max_bytes`, never splitting a code point.
pub fn truncate_utf8(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_output_is_done() {
        assert_eq!(Reply::from_output(Ok(String::new()), 10), Reply::text("Done."));
        assert_eq!(Reply::from_output(Ok("\n".to_string()), 10), Reply::text("Done."));
    }

    #[test]
    fn test_output_is_truncated() {
        let reply = Reply::from_output(Ok("abcdefghij".to_string()), 4);
        assert_eq!(reply, Reply::text("abcd"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // "é" is two bytes, "€" is three.
        assert_eq!(truncate_utf8("aé", 2), "a");
        assert_eq!(truncate_utf8("€€", 5), "€");
        assert_eq!(truncate_utf8("€€", 6), "€€");
        assert_eq!(truncate_utf8("€", 2), "");
    }

    #[test]
    fn test_errors_become_text() {
        let reply = Reply::from_output(Err(CollaboratorError::Failed("boom".into())), 100);
        assert_eq!(reply.as_text(), Some("boom"));

        let reply = Reply::from_image(Err(CollaboratorError::Unavailable("no camera".into())), 100);
        assert_eq!(reply.as_text(), Some("no camera"));
    }
}
