//! Wire encoding for the push stream.
//!
//! Every event becomes one Server-Sent-Events frame:
//!
//! ```text
//! event: message
//! data: {"user":{"id":"u1"},"message":{"body":"hi"}}
//!
//! ```
//!
//! The payload is serialized as single-line JSON. JSON escapes `\n` and `\r`,
//! which are the only SSE line terminators, so user text can never end the
//! `data:` line early or smuggle in a second frame.

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use super::errors::HubError;

/// SSE event name attached to every broadcast frame.
pub const EVENT_NAME: &str = "message";

/// Encodes payloads into self-delimited SSE frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventEncoder;

impl EventEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self
    }

    /// Serialize `payload` into one complete frame.
    ///
    /// # Errors
    ///
    /// Returns `HubError::Encoding` if the payload cannot be serialized.
    pub fn encode<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Bytes, HubError> {
        let json = serde_json::to_vec(payload).map_err(|e| HubError::Encoding(e.to_string()))?;

        let mut frame = BytesMut::with_capacity(json.len() + EVENT_NAME.len() + 16);
        frame.put_slice(b"event: ");
        frame.put_slice(EVENT_NAME.as_bytes());
        frame.put_slice(b"\ndata: ");
        frame.put_slice(&json);
        frame.put_slice(b"\n\n");
        Ok(frame.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::messaging::Event;

    fn event(body: &str) -> Event {
        Event::new(UserId::new("u1").unwrap(), body)
    }

    fn data_line(frame: &[u8]) -> serde_json::Value {
        let text = std::str::from_utf8(frame).unwrap();
        let line = text
            .lines()
            .find_map(|l| l.strip_prefix("data: "))
            .expect("frame has a data line");
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn encodes_single_sse_frame() {
        let frame = EventEncoder::new().encode(&event("hi")).unwrap();
        assert_eq!(
            &frame[..],
            br#"event: message
data: {"user":{"id":"u1"},"message":{"body":"hi"}}

"#
        );
    }

    #[test]
    fn newlines_in_body_cannot_split_the_frame() {
        let hostile = "hi\n\nevent: message\ndata: {\"forged\":true}\r\n\r\n";
        let frame = EventEncoder::new().encode(&event(hostile)).unwrap();
        let text = std::str::from_utf8(&frame).unwrap();

        // Only the trailing terminator ends a frame.
        assert_eq!(text.matches("\n\n").count(), 1);
        assert!(text.ends_with("\n\n"));
        assert!(!text.contains('\r'));
        assert_eq!(text.lines().filter(|l| l.starts_with("data:")).count(), 1);

        let payload = data_line(&frame);
        assert_eq!(payload["message"]["body"], hostile);
    }

    #[test]
    fn includes_timestamp_when_present() {
        let frame = EventEncoder::new().encode(&event("hi").stamped()).unwrap();
        let payload = data_line(&frame);
        assert!(payload["timestamp"].is_string());
    }

    #[test]
    fn unserializable_payload_is_an_encoding_error() {
        struct Unserializable;

        impl Serialize for Unserializable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("not representable"))
            }
        }

        let err = EventEncoder::new().encode(&Unserializable).unwrap_err();
        assert!(matches!(err, HubError::Encoding(ref msg) if msg.contains("not representable")));
    }
}
