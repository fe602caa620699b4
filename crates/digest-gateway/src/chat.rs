//! Chat assistant gateway.
//!
//! The backend streams the assistant's reply as text lines. Each fragment
//! line is `0:` followed by a JSON-encoded string; any other line (blank
//! keep-alives, metadata) is skipped.
//!
//! ```text
//! 0:"Your "
//! 0:"next meeting is at 2pm."
//! ```

use std::collections::VecDeque;

use futures::stream::{self, BoxStream, StreamExt};
use serde::Serialize;
use tracing::{debug, trace};

use digest_core::{defaults, ChatMessage, Error, Result};

use crate::client::BackendClient;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
}

/// Incremental decoder for the fragment line protocol.
///
/// Bytes are buffered until a newline arrives, so multi-byte characters
/// split across network chunks decode correctly.
#[derive(Debug, Default)]
pub struct FragmentDecoder {
    buf: Vec<u8>,
}

impl FragmentDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk; returns the fragments of every completed line.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<String>> {
        self.buf.extend_from_slice(chunk);
        let mut out = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            if let Some(fragment) = decode_line(&line[..line.len() - 1]) {
                out.push(fragment);
            }
        }
        out
    }

    /// Flush a final line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<Result<String>> {
        if self.buf.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.buf);
        decode_line(&line)
    }
}

fn decode_line(raw: &[u8]) -> Option<Result<String>> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches('\r');
    let payload = line.strip_prefix(defaults::CHAT_TEXT_PREFIX)?;
    Some(
        serde_json::from_str::<String>(payload)
            .map_err(|e| Error::Chat(format!("Malformed fragment {:?}: {}", payload, e))),
    )
}

/// Talks to the chat assistant.
#[derive(Clone)]
pub struct ChatGateway {
    client: BackendClient,
}

impl ChatGateway {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Send the conversation and stream the reply fragment by fragment.
    pub async fn stream_reply(
        &self,
        messages: &[ChatMessage],
    ) -> Result<BoxStream<'static, Result<String>>> {
        if messages.is_empty() {
            return Err(Error::Chat("conversation has no messages".to_string()));
        }

        debug!(message_count = messages.len(), "Starting chat reply");
        let response = self
            .client
            .post(defaults::CHAT_PATH, &ChatRequest { messages })
            .await
            .map_err(Error::Chat)?;

        let bytes = response.bytes_stream().boxed();
        let ready: VecDeque<Result<String>> = VecDeque::new();
        let state = (bytes, FragmentDecoder::new(), ready, false);

        let fragments = stream::unfold(state, |(mut bytes, mut decoder, mut ready, mut done)| async move {
            loop {
                if let Some(fragment) = ready.pop_front() {
                    return Some((fragment, (bytes, decoder, ready, done)));
                }
                if done {
                    return None;
                }
                match bytes.next().await {
                    Some(Ok(chunk)) => {
                        trace!(chunk_len = chunk.len(), "Chat chunk");
                        ready.extend(decoder.push(&chunk));
                    }
                    Some(Err(e)) => {
                        done = true;
                        ready.push_back(Err(Error::Chat(format!("Stream interrupted: {}", e))));
                    }
                    None => {
                        done = true;
                        ready.extend(decoder.finish());
                    }
                }
            }
        });

        Ok(fragments.boxed())
    }

    /// Send the conversation and wait for the complete reply.
    pub async fn reply(&self, messages: &[ChatMessage]) -> Result<String> {
        let mut fragments = self.stream_reply(messages).await?;
        let mut reply = String::new();
        while let Some(fragment) = fragments.next().await {
            reply.push_str(&fragment?);
        }
        debug!(response_len = reply.len(), "Chat reply complete");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(results: Vec<Result<String>>) -> Vec<String> {
        results.into_iter().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_decoder_single_chunk() {
        let mut decoder = FragmentDecoder::new();
        let out = collect(decoder.push(b"0:\"Hel\"\n0:\"lo\"\n"));
        assert_eq!(out, vec!["Hel", "lo"]);
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn test_decoder_split_across_chunks() {
        let mut decoder = FragmentDecoder::new();
        assert!(decoder.push(b"0:\"caf").is_empty());
        let out = collect(decoder.push("é\"\n".as_bytes()));
        assert_eq!(out, vec!["café"]);
    }

    #[test]
    fn test_decoder_multibyte_split_mid_char() {
        let bytes = "0:\"é\"\n".as_bytes();
        let mut decoder = FragmentDecoder::new();
        // 'é' is two bytes; split between them.
        assert!(decoder.push(&bytes[..4]).is_empty());
        let out = collect(decoder.push(&bytes[4..]));
        assert_eq!(out, vec!["é"]);
    }

    #[test]
    fn test_decoder_skips_other_lines() {
        let mut decoder = FragmentDecoder::new();
        let out = collect(decoder.push(b"\n d:{\"finishReason\":\"stop\"}\n0:\"ok\"\r\n"));
        assert_eq!(out, vec!["ok"]);
    }

    #[test]
    fn test_decoder_unescapes_json() {
        let mut decoder = FragmentDecoder::new();
        let out = collect(decoder.push(b"0:\"line\\nbreak \\\"quoted\\\"\"\n"));
        assert_eq!(out, vec!["line\nbreak \"quoted\""]);
    }

    #[test]
    fn test_decoder_finish_flushes_unterminated_line() {
        let mut decoder = FragmentDecoder::new();
        assert!(decoder.push(b"0:\"tail\"").is_empty());
        assert_eq!(decoder.finish().unwrap().unwrap(), "tail");
    }

    #[test]
    fn test_decoder_malformed_fragment() {
        let mut decoder = FragmentDecoder::new();
        let out = decoder.push(b"0:not-json\n");
        assert!(matches!(out[0], Err(Error::Chat(_))));
    }
}
