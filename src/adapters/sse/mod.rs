//! Server-Sent Events transport for subscriber streams.

mod sink;
mod stream;

pub use sink::ChannelSink;
pub use stream::{open_event_stream, CONNECTED_FRAME};
