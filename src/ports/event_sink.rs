//! EventSink port - Push handle for one subscriber's stream.
//!
//! The transport layer owns the sink (an SSE response body, a test
//! recorder, ...). The hub only holds a reference and uses two capabilities:
//! push an encoded frame, and close the stream.

use async_trait::async_trait;
use bytes::Bytes;

/// Errors a sink can report when a frame is pushed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The stream is gone (client disconnected or sink closed).
    #[error("Sink is closed")]
    Closed,

    /// Transport-specific failure.
    #[error("Sink write failed: {0}")]
    Write(String),
}

/// Port for pushing encoded frames to a single subscriber.
///
/// Implementations must:
/// - Deliver frames from sequential `send` calls in call order
/// - Make `close` idempotent and non-blocking
/// - Fail `send` with `SinkError::Closed` once closed, including a send that
///   was already waiting for buffer space when `close` ran
///
/// `send` may wait for buffer space; callers bound it with their own timeout.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Push one complete frame.
    async fn send(&self, frame: Bytes) -> Result<(), SinkError>;

    /// Close the stream. Later sends fail with `SinkError::Closed`.
    fn close(&self);
}
