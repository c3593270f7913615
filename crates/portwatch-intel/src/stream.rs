//! The live banner firehose.
//!
//! The feed delivers banners as newline-delimited JSON over a
//! long-lived HTTP response. [`Firehose`] buffers the chunked body and
//! yields one [`BannerEvent`] per line. Remote EOF ends the stream and
//! is a normal condition, not an error; callers reopen through the
//! client after their cooldown.

use std::collections::VecDeque;

use portwatch_core::BannerEvent;

use crate::error::{IntelError, Result};

/// A lazy, unbounded sequence of banner events.
///
/// `next_event` returning `None` means the stream is closed. A closed
/// stream is not restartable.
#[allow(async_fn_in_trait)]
pub trait EventStream {
    async fn next_event(&mut self) -> Option<Result<BannerEvent>>;
}

/// NDJSON decoder over a streaming HTTP response body.
pub struct Firehose {
    body: reqwest::Response,
    frames: FrameBuffer,
    closed: bool,
}

impl Firehose {
    pub(crate) fn new(body: reqwest::Response) -> Self {
        Self {
            body,
            frames: FrameBuffer::default(),
            closed: false,
        }
    }
}

impl EventStream for Firehose {
    async fn next_event(&mut self) -> Option<Result<BannerEvent>> {
        loop {
            if let Some(line) = self.frames.next_frame() {
                return Some(serde_json::from_str(&line).map_err(IntelError::Decode));
            }
            if self.closed {
                return None;
            }
            match self.body.chunk().await {
                Ok(Some(chunk)) => self.frames.push(&chunk),
                Ok(None) => {
                    self.closed = true;
                    self.frames.flush_tail();
                }
                Err(e) => {
                    self.closed = true;
                    return Some(Err(IntelError::Http(e)));
                }
            }
        }
    }
}

/// Splits an incoming byte sequence into complete newline-terminated
/// frames, tolerating frames that span chunk boundaries. Blank lines
/// (the feed's keepalives) are dropped.
#[derive(Default)]
pub struct FrameBuffer {
    buf: Vec<u8>,
    ready: VecDeque<String>,
}

impl FrameBuffer {
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            self.enqueue(&line);
        }
    }

    /// Treat a buffered tail without a trailing newline as a final frame.
    pub fn flush_tail(&mut self) {
        let tail = std::mem::take(&mut self.buf);
        self.enqueue(&tail);
    }

    pub fn next_frame(&mut self) -> Option<String> {
        self.ready.pop_front()
    }

    fn enqueue(&mut self, raw: &[u8]) {
        let line = String::from_utf8_lossy(raw).trim().to_string();
        if !line.is_empty() {
            self.ready.push_back(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_split_on_newlines() {
        let mut frames = FrameBuffer::default();
        frames.push(b"{\"a\":1}\n{\"b\":2}\n");
        assert_eq!(frames.next_frame().as_deref(), Some("{\"a\":1}"));
        assert_eq!(frames.next_frame().as_deref(), Some("{\"b\":2}"));
        assert_eq!(frames.next_frame(), None);
    }

    #[test]
    fn frames_span_chunk_boundaries() {
        let mut frames = FrameBuffer::default();
        frames.push(b"{\"ip_str\":\"10.");
        assert_eq!(frames.next_frame(), None);
        frames.push(b"0.0.1\"}\n");
        assert_eq!(frames.next_frame().as_deref(), Some("{\"ip_str\":\"10.0.0.1\"}"));
    }

    #[test]
    fn blank_keepalive_lines_are_dropped() {
        let mut frames = FrameBuffer::default();
        frames.push(b"\n\r\n{\"a\":1}\n\n");
        assert_eq!(frames.next_frame().as_deref(), Some("{\"a\":1}"));
        assert_eq!(frames.next_frame(), None);
    }

    #[test]
    fn flush_tail_emits_unterminated_frame() {
        let mut frames = FrameBuffer::default();
        frames.push(b"{\"a\":1}");
        assert_eq!(frames.next_frame(), None);
        frames.flush_tail();
        assert_eq!(frames.next_frame().as_deref(), Some("{\"a\":1}"));
    }

    fn response_from(body: &str) -> reqwest::Response {
        http::Response::builder()
            .status(200)
            .body(body.to_string())
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn firehose_yields_events_then_closes() {
        let body = concat!(
            r#"{"ip_str":"10.0.0.1","port":443,"transport":"tcp","title":"nginx"}"#,
            "\n\n",
            r#"{"ip_str":"10.0.0.2","port":22,"transport":"tcp"}"#,
            "\n",
        );
        let mut stream = Firehose::new(response_from(body));

        let first = stream.next_event().await.unwrap().unwrap();
        assert_eq!(first.ip, "10.0.0.1");
        assert_eq!(first.title.as_deref(), Some("nginx"));

        let second = stream.next_event().await.unwrap().unwrap();
        assert_eq!(second.port, 22);

        assert!(stream.next_event().await.is_none());
        // Closed means closed: further polls stay at end-of-stream.
        assert!(stream.next_event().await.is_none());
    }

    #[tokio::test]
    async fn firehose_surfaces_decode_errors() {
        let mut stream = Firehose::new(response_from("not json\n"));
        let result = stream.next_event().await.unwrap();
        assert!(matches!(result, Err(IntelError::Decode(_))));
        assert!(stream.next_event().await.is_none());
    }
}
