//! Per-connection accumulation buffer and message extraction.
//!
//! TCP is a byte stream: one `read()` may return half a message, or three
//! messages glued together.  Each connection therefore owns a [`FrameBuffer`]
//! that accumulates decoded text until at least one complete
//! newline-delimited message is available.
//!
//! Extraction rule: repeatedly search the buffer for `\n`; everything before
//! it (trimmed of surrounding whitespace) is one message, and the delimiter is
//! consumed.  Empty lines are skipped.  The buffer holds only bytes not yet
//! resolved into a complete message.
//!
//! A compatibility fallback tolerates legacy senders that write exactly one
//! JSON object per send with no trailing newline: if, after newline
//! extraction, the buffer begins with `{` and ends with `}`, the whole buffer
//! is taken as one message.  The heuristic is intentionally not applied to
//! multiple back-to-back undelimited objects; newline framing is the primary
//! contract for all new senders.

use tracing::trace;

/// Accumulates inbound text for one connection and yields complete messages.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: String,
}

impl FrameBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a decoded text chunk to the buffer.
    pub fn push(&mut self, chunk: &str) {
        self.buf.push_str(chunk);
    }

    /// Appends a raw byte chunk, decoding it as UTF-8.
    ///
    /// Invalid sequences are replaced with U+FFFD rather than treated as a
    /// connection error; a malformed message will be dropped downstream when
    /// JSON parsing fails.
    pub fn push_bytes(&mut self, chunk: &[u8]) {
        self.buf.push_str(&String::from_utf8_lossy(chunk));
    }

    /// Extracts every complete message currently in the buffer, in arrival
    /// order.
    ///
    /// Consumed messages (and their delimiters) are removed from the buffer;
    /// a trailing partial message is retained for the next call.
    pub fn drain_messages(&mut self) -> Vec<String> {
        let mut messages = Vec::new();

        while let Some(newline_pos) = self.buf.find('\n') {
            let message = self.buf[..newline_pos].trim().to_string();
            self.buf.drain(..=newline_pos);
            if !message.is_empty() {
                messages.push(message);
            }
        }

        // Fallback for legacy senders that omit the trailing newline: a
        // buffer that looks like one complete JSON object is taken whole.
        if !self.buf.is_empty() && self.buf.starts_with('{') && self.buf.ends_with('}') {
            let message = self.buf.trim().to_string();
            self.buf.clear();
            trace!(len = message.len(), "undelimited object taken via fallback");
            messages.push(message);
        }

        messages
    }

    /// Number of buffered, not-yet-delimited bytes.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    /// True when no partial message is buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_delimited_message() {
        let mut fb = FrameBuffer::new();
        fb.push("{\"method\":\"ping\"}\n");
        assert_eq!(fb.drain_messages(), vec!["{\"method\":\"ping\"}"]);
        assert!(fb.is_empty());
    }

    #[test]
    fn two_messages_in_one_chunk_preserve_order() {
        let mut fb = FrameBuffer::new();
        fb.push("msg1\nmsg2\n");
        assert_eq!(fb.drain_messages(), vec!["msg1", "msg2"]);
    }

    #[test]
    fn split_across_reads_yields_same_messages() {
        // The concatenation equals `msg1\nmsg2\n`; chunk boundaries must not
        // affect what the dispatcher sees.
        let mut fb = FrameBuffer::new();
        let mut seen = Vec::new();
        for chunk in ["ms", "g1\nms", "g2", "\n"] {
            fb.push(chunk);
            seen.extend(fb.drain_messages());
        }
        assert_eq!(seen, vec!["msg1", "msg2"]);
    }

    #[test]
    fn every_split_of_two_messages_is_equivalent() {
        let full = "{\"method\":\"a\"}\n{\"method\":\"b\"}\n";
        for cut in 0..=full.len() {
            let mut fb = FrameBuffer::new();
            let mut seen = Vec::new();
            fb.push(&full[..cut]);
            seen.extend(fb.drain_messages());
            fb.push(&full[cut..]);
            seen.extend(fb.drain_messages());
            assert_eq!(
                seen,
                vec!["{\"method\":\"a\"}", "{\"method\":\"b\"}"],
                "split at byte {cut}"
            );
        }
    }

    #[test]
    fn partial_message_is_retained_not_dispatched() {
        let mut fb = FrameBuffer::new();
        fb.push("{\"method\":\"x\"");
        assert!(fb.drain_messages().is_empty());
        assert_eq!(fb.pending_len(), 13);

        fb.push("}\n");
        assert_eq!(fb.drain_messages(), vec!["{\"method\":\"x\"}"]);
        assert!(fb.is_empty());
    }

    #[test]
    fn messages_are_whitespace_trimmed() {
        let mut fb = FrameBuffer::new();
        fb.push("  {\"method\":\"x\"}  \r\n");
        assert_eq!(fb.drain_messages(), vec!["{\"method\":\"x\"}"]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut fb = FrameBuffer::new();
        fb.push("\n\n  \nreal\n");
        assert_eq!(fb.drain_messages(), vec!["real"]);
    }

    #[test]
    fn undelimited_json_object_fallback() {
        let mut fb = FrameBuffer::new();
        fb.push("{\"method\":\"legacy\"}");
        assert_eq!(fb.drain_messages(), vec!["{\"method\":\"legacy\"}"]);
        assert!(fb.is_empty());
    }

    #[test]
    fn fallback_runs_after_newline_extraction() {
        let mut fb = FrameBuffer::new();
        fb.push("first\n{\"method\":\"legacy\"}");
        assert_eq!(fb.drain_messages(), vec!["first", "{\"method\":\"legacy\"}"]);
    }

    #[test]
    fn truncated_object_does_not_trigger_fallback() {
        let mut fb = FrameBuffer::new();
        fb.push("{\"method\":\"x\", \"params\": {");
        assert!(fb.drain_messages().is_empty());
        assert!(!fb.is_empty());
    }

    #[test]
    fn non_json_tail_is_retained() {
        let mut fb = FrameBuffer::new();
        fb.push("done\npartial tail");
        assert_eq!(fb.drain_messages(), vec!["done"]);
        assert_eq!(fb.pending_len(), "partial tail".len());
    }

    #[test]
    fn push_bytes_handles_invalid_utf8() {
        let mut fb = FrameBuffer::new();
        fb.push_bytes(b"ok\n\xffgarbage");
        let msgs = fb.drain_messages();
        assert_eq!(msgs, vec!["ok"]);
    }
}
