use serde::Deserialize;

use crate::errors::ChatError;

/// One newline-delimited record of a streamed reply.
#[derive(Debug, Deserialize)]
struct StreamRecord {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Assembles assistant reply content from a chunked response body.
///
/// Bytes are buffered until a newline completes a record; the trailing
/// partial line is carried over to the next chunk. Records optionally carry
/// a `"data: "` prefix. Lines that fail to parse as JSON are discarded:
/// chunk boundaries are not aligned with record boundaries and a fragment
/// that straddles one without its newline is intentionally lossy.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    buffer: Vec<u8>,
    content: String,
    done: bool,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full reply accumulated so far. Callers replace the visible message
    /// with this value rather than appending deltas, so reprocessing a chunk
    /// cannot double-insert text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// True once a `done: true` record has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one transport chunk. Returns the content deltas decoded from it,
    /// in arrival order.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, ChatError> {
        let mut deltas = Vec::new();
        if self.done {
            return Ok(deltas);
        }

        self.buffer.extend_from_slice(chunk);
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.process_line(&line[..line.len() - 1], &mut deltas)?;
            if self.done {
                break;
            }
        }
        Ok(deltas)
    }

    /// The reader is exhausted; parse whatever is still buffered as one
    /// final record.
    pub fn finish(&mut self) -> Result<Vec<String>, ChatError> {
        let mut deltas = Vec::new();
        if self.done || self.buffer.is_empty() {
            self.buffer.clear();
            return Ok(deltas);
        }

        let line = std::mem::take(&mut self.buffer);
        self.process_line(&line, &mut deltas)?;
        Ok(deltas)
    }

    fn process_line(&mut self, line: &[u8], deltas: &mut Vec<String>) -> Result<(), ChatError> {
        let Ok(text) = std::str::from_utf8(line) else {
            tracing::debug!("discarding non-utf8 stream line");
            return Ok(());
        };

        let text = text.strip_prefix("data: ").unwrap_or(text).trim();
        if text.is_empty() {
            return Ok(());
        }

        let record: StreamRecord = match serde_json::from_str(text) {
            Ok(record) => record,
            Err(_) => {
                tracing::debug!(len = text.len(), "discarding unparseable stream line");
                return Ok(());
            }
        };

        if let Some(error) = record.error {
            return Err(ChatError::Stream(error));
        }
        if let Some(content) = record.content {
            if !content.is_empty() {
                self.content.push_str(&content);
                deltas.push(content);
            }
        }
        if record.done {
            self.done = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_all(decoder: &mut StreamDecoder, bytes: &[u8]) -> Vec<String> {
        let mut deltas = decoder.push(bytes).unwrap();
        deltas.extend(decoder.finish().unwrap());
        deltas
    }

    #[test]
    fn test_two_chunk_scenario() {
        let mut decoder = StreamDecoder::new();
        decoder.push(b"data: {\"content\":\"OLAS is \"}\n\n").unwrap();
        decoder
            .push(b"data: {\"content\":\"a framework.\"}\n\ndata: {\"done\":true}\n\n")
            .unwrap();

        assert_eq!(decoder.content(), "OLAS is a framework.");
        assert!(decoder.is_done());
    }

    #[test]
    fn test_content_identical_for_any_byte_split() {
        let stream = b"{\"content\":\"OLAS is \"}\n{\"content\":\"a framework.\"}\n{\"done\":true}\n";

        for split in 0..stream.len() {
            let mut decoder = StreamDecoder::new();
            decoder.push(&stream[..split]).unwrap();
            decoder.push(&stream[split..]).unwrap();
            decoder.finish().unwrap();
            assert_eq!(
                decoder.content(),
                "OLAS is a framework.",
                "split at byte {split}"
            );
        }
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let mut decoder = StreamDecoder::new();
        let deltas = push_all(
            &mut decoder,
            b"{\"content\":\"a\"}\n{not json at all\n{\"content\":\"b\"}\n",
        );

        assert_eq!(decoder.content(), "ab");
        assert_eq!(deltas, vec!["a", "b"]);
    }

    #[test]
    fn test_plain_and_prefixed_records_mix() {
        let mut decoder = StreamDecoder::new();
        push_all(
            &mut decoder,
            b"data: {\"content\":\"one \"}\n{\"content\":\"two\"}\n",
        );
        assert_eq!(decoder.content(), "one two");
    }

    #[test]
    fn test_trailing_record_without_newline_is_flushed() {
        let mut decoder = StreamDecoder::new();
        decoder.push(b"{\"content\":\"partial\"}").unwrap();
        assert_eq!(decoder.content(), "");

        decoder.finish().unwrap();
        assert_eq!(decoder.content(), "partial");
    }

    #[test]
    fn test_lines_after_done_are_ignored() {
        let mut decoder = StreamDecoder::new();
        decoder
            .push(b"{\"content\":\"kept\"}\n{\"done\":true}\n{\"content\":\"dropped\"}\n")
            .unwrap();

        assert!(decoder.is_done());
        assert_eq!(decoder.content(), "kept");

        // Later chunks and the final flush are no-ops once done.
        assert!(decoder.push(b"{\"content\":\"late\"}\n").unwrap().is_empty());
        assert!(decoder.finish().unwrap().is_empty());
        assert_eq!(decoder.content(), "kept");
    }

    #[test]
    fn test_error_record_fails_the_stream() {
        let mut decoder = StreamDecoder::new();
        decoder.push(b"{\"content\":\"so far\"}\n").unwrap();
        let err = decoder
            .push(b"{\"error\":\"model unavailable\"}\n")
            .unwrap_err();

        assert!(matches!(err, ChatError::Stream(reason) if reason == "model unavailable"));
    }

    #[test]
    fn test_empty_content_field_produces_no_delta() {
        let mut decoder = StreamDecoder::new();
        let deltas = decoder.push(b"{\"content\":\"\"}\n{\"content\":\"x\"}\n").unwrap();
        assert_eq!(deltas, vec!["x"]);
        assert_eq!(decoder.content(), "x");
    }
}
