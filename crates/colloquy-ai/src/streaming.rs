//! Server-Sent Events (SSE) stream decoder.
//!
//! Gemini's `streamGenerateContent?alt=sse` answers with one SSE event
//! per partial response. Events are decoded lazily: nothing is read from
//! the connection until the consumer polls for the next event.

use futures_util::stream::{self, Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio_util::io::StreamReader;

use crate::ChatError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The `data:` lines of the event, joined with `\n`.
    pub data: String,
}

struct Decoder<R> {
    lines: Lines<R>,
    done: bool,
}

/// Decode the SSE body of a reqwest response.
pub fn response_events(
    response: reqwest::Response,
) -> impl Stream<Item = Result<SseEvent, ChatError>> + Send + 'static {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    sse_events(BufReader::new(StreamReader::new(byte_stream)))
}

/// Decode SSE events from any buffered reader.
///
/// Only `data:` fields are kept; comments and the other fields are
/// ignored. An event still buffered when the input ends is emitted. Bytes
/// that are not UTF-8 surface as `ChatError::Parse`, other read failures
/// as `ChatError::Network`. Either ends the stream.
pub fn sse_events<R>(reader: R) -> impl Stream<Item = Result<SseEvent, ChatError>> + Send + 'static
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let decoder = Decoder {
        lines: reader.lines(),
        done: false,
    };

    stream::unfold(decoder, |mut decoder| async move {
        if decoder.done {
            return None;
        }

        let mut data = String::new();

        loop {
            match decoder.lines.next_line().await {
                Ok(Some(line)) => {
                    if line.is_empty() {
                        // Empty line = end of event
                        if !data.is_empty() {
                            return Some((Ok(SseEvent { data }), decoder));
                        }
                        continue;
                    }

                    if let Some(value) = field(&line, "data") {
                        if !data.is_empty() {
                            data.push('\n');
                        }
                        data.push_str(value);
                    }
                }
                Ok(None) => {
                    decoder.done = true;
                    if data.is_empty() {
                        return None;
                    }
                    return Some((Ok(SseEvent { data }), decoder));
                }
                Err(e) => {
                    decoder.done = true;
                    let err = if e.kind() == std::io::ErrorKind::InvalidData {
                        ChatError::Parse(format!("invalid stream data: {e}"))
                    } else {
                        ChatError::Network(e.to_string())
                    };
                    return Some((Err(err), decoder));
                }
            }
        }
    })
}

/// Value of `name:` on this line, with the single optional leading space
/// removed.
fn field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}
