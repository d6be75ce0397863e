//! SockJS framing for OctoPrint's push channel.
//!
//! OctoPrint exposes its push API through SockJS. This crate only speaks the
//! `xhr` polling transport, where every poll returns newline-terminated
//! frames:
//!
//! | Frame | Meaning |
//! |-------|---------|
//! | `o` | Session opened |
//! | `h` | Heartbeat |
//! | `a[...]` | Array of messages |
//! | `m...` | Single message |
//! | `c[code,"reason"]` | Session closed |
//!
//! Messages inside `a` frames may arrive either as JSON objects or as
//! strings containing encoded JSON; both are decoded to objects.
//!
//! # Examples
//!
//! ```
//! use octoprint_client::protocol::{Frame, FrameParser};
//!
//! let mut parser = FrameParser::new();
//! let frames = parser.feed(b"o\n").unwrap();
//! assert_eq!(frames, vec![Frame::Open]);
//!
//! let frames = parser.feed(br#"a[{"event": {"type": "Connected"}}]"#).unwrap();
//! assert!(frames.is_empty());
//! let frames = parser.feed(b"\n").unwrap();
//! assert!(matches!(&frames[0], Frame::Messages(m) if m.len() == 1));
//! ```

use crate::error::{OctoPrintError, Result};
use bytes::BytesMut;
use serde_json::Value;

/// A decoded SockJS frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Session opened (`o`)
    Open,
    /// Keep-alive (`h`)
    Heartbeat,
    /// One or more messages (`a[...]` or `m...`)
    Messages(Vec<Value>),
    /// Session closed (`c[code,"reason"]`)
    Close {
        /// Close code
        code: u16,
        /// Close reason
        reason: String,
    },
}

/// Incremental frame parser.
///
/// Bytes are accumulated until a newline terminates a frame. Partial frames
/// stay buffered across calls to [`feed`](FrameParser::feed).
#[derive(Debug, Default)]
pub struct FrameParser {
    buffer: BytesMut,
}

impl FrameParser {
    /// Create an empty parser
    pub fn new() -> Self {
        FrameParser {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Feed bytes and return every frame completed by them.
    pub fn feed(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buffer.extend_from_slice(data);
        let mut frames = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line = self.buffer.split_to(pos + 1);
            if let Some(frame) = parse_line(&line[..pos])? {
                frames.push(frame);
            }
        }

        Ok(frames)
    }

    /// Parse whatever is left in the buffer as a final, unterminated frame.
    pub fn finish(&mut self) -> Result<Option<Frame>> {
        let rest = self.buffer.split();
        parse_line(&rest)
    }

    /// Number of buffered bytes not yet part of a complete frame.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn parse_line(line: &[u8]) -> Result<Option<Frame>> {
    let text = std::str::from_utf8(line)
        .map_err(|e| OctoPrintError::Push(format!("frame is not utf-8: {}", e)))?
        .trim();
    if text.is_empty() {
        return Ok(None);
    }
    parse_frame(text).map(Some)
}

/// Parse a single frame without its trailing newline.
pub fn parse_frame(frame: &str) -> Result<Frame> {
    let mut chars = frame.chars();
    let kind = chars.next();
    let payload = chars.as_str();
    match kind {
        Some('o') => Ok(Frame::Open),
        Some('h') => Ok(Frame::Heartbeat),
        Some('a') => {
            let items: Vec<Value> = serde_json::from_str(payload)
                .map_err(|e| OctoPrintError::Push(format!("invalid message array: {}", e)))?;
            Ok(Frame::Messages(items.into_iter().map(decode_message).collect()))
        }
        Some('m') => {
            let item: Value = serde_json::from_str(payload)
                .map_err(|e| OctoPrintError::Push(format!("invalid message: {}", e)))?;
            Ok(Frame::Messages(vec![decode_message(item)]))
        }
        Some('c') => {
            let (code, reason): (u16, String) = serde_json::from_str(payload)
                .map_err(|e| OctoPrintError::Push(format!("invalid close frame: {}", e)))?;
            Ok(Frame::Close { code, reason })
        }
        _ => Err(OctoPrintError::Push(format!("unknown frame: {}", frame))),
    }
}

fn decode_message(item: Value) -> Value {
    match item {
        Value::String(encoded) => match serde_json::from_str::<Value>(&encoded) {
            Ok(decoded @ Value::Object(_)) => decoded,
            _ => Value::String(encoded),
        },
        other => other,
    }
}

/// Encode outgoing messages for `xhr_send`: a JSON array of JSON strings.
pub fn encode_send_body(messages: &[Value]) -> Value {
    Value::Array(
        messages
            .iter()
            .map(|m| Value::String(m.to_string()))
            .collect(),
    )
}
