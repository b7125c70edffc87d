//! Turns a hub subscription into a streaming SSE response body.
//!
//! Lifecycle:
//! 1. Open the subscription (validation, duplicate check) before any byte is sent
//! 2. Spawn a task that holds the subscription until the body goes away
//! 3. Stream a `: connected` comment, then every frame the hub pushes
//!
//! The body owns a drop guard. When the client disconnects, axum drops the
//! body, the guard fires, and the task unregisters the connection. When the
//! hub closes the sink, the body ends and the same guard fires.

use std::convert::Infallible;

use axum::body::Body;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::application::hub::Hub;
use crate::domain::messaging::HubError;

use super::sink::ChannelSink;

/// Comment frame sent as soon as the stream opens.
pub const CONNECTED_FRAME: &[u8] = b": connected\n\n";

/// Subscribe `(channel_id, user_id, session_id)` and return the body that
/// streams its events.
///
/// # Errors
///
/// Any admission error from [`Hub::open`]; nothing is registered then.
pub fn open_event_stream(
    hub: &Hub,
    channel_id: &str,
    user_id: &str,
    session_id: &str,
    buffer: usize,
) -> Result<Body, HubError> {
    let (sink, rx) = ChannelSink::new(buffer);
    let subscription = hub.open(channel_id, user_id, session_id, sink)?;

    let disconnected = CancellationToken::new();
    let guard = disconnected.clone().drop_guard();
    tokio::spawn(subscription.run_until(disconnected.cancelled_owned()));

    let frames = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        rx.recv()
            .await
            .map(|frame| (Ok::<_, Infallible>(frame), (rx, guard)))
    });
    let body = stream::once(async { Ok::<_, Infallible>(Bytes::from_static(CONNECTED_FRAME)) })
        .chain(frames);

    Ok(Body::from_stream(body))
}
