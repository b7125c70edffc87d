//! Broadcast engine - fan one event out to every subscriber of a channel.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::foundation::{ChannelId, ConnectionId, SessionId, UserId};
use crate::domain::messaging::{DeliveryError, Event, EventEncoder, HubError};

use super::connection::Connection;
use super::registry::ConnectionRegistry;

/// One subscriber that did not receive the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub session_id: SessionId,
    pub error: DeliveryError,
}

impl DeliveryFailure {
    fn new(connection: &Connection, error: DeliveryError) -> Self {
        Self {
            connection_id: connection.id(),
            user_id: connection.user_id().clone(),
            session_id: connection.session_id().clone(),
            error,
        }
    }
}

/// Outcome of a single broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub channel_id: ChannelId,
    /// Subscribers in the snapshot taken at broadcast time.
    pub recipients: usize,
    pub delivered: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    fn empty(channel_id: ChannelId) -> Self {
        Self {
            channel_id,
            recipients: 0,
            delivered: 0,
            failures: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn all_delivered(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Encodes once, snapshots the channel and sends to every subscriber
/// concurrently.
///
/// A failed or timed out send evicts that subscriber and is recorded in the
/// report; it never affects the other subscribers or the caller. The call
/// returns only after every send has finished, so sequential broadcasts reach
/// each subscriber in call order.
pub struct BroadcastEngine {
    registry: Arc<ConnectionRegistry>,
    encoder: EventEncoder,
    send_timeout: Duration,
}

impl BroadcastEngine {
    pub fn new(registry: Arc<ConnectionRegistry>, send_timeout: Duration) -> Self {
        Self {
            registry,
            encoder: EventEncoder::new(),
            send_timeout,
        }
    }

    /// Deliver `event` to every active connection on `channel_id`.
    ///
    /// # Errors
    ///
    /// `HubError::Encoding` if the event cannot be encoded. Nobody receives
    /// anything in that case.
    pub async fn broadcast(
        &self,
        channel_id: &ChannelId,
        event: &Event,
    ) -> Result<DeliveryReport, HubError> {
        self.broadcast_payload(channel_id, event).await
    }

    /// Same as [`broadcast`](Self::broadcast) for any serializable payload.
    pub async fn broadcast_payload<T>(
        &self,
        channel_id: &ChannelId,
        payload: &T,
    ) -> Result<DeliveryReport, HubError>
    where
        T: Serialize + ?Sized,
    {
        let frame = self.encoder.encode(payload).map_err(|e| {
            warn!(channel_id = %channel_id, error = %e, "Event encoding failed");
            e
        })?;

        let recipients = self.registry.snapshot(channel_id);
        if recipients.is_empty() {
            debug!(channel_id = %channel_id, "No subscribers, event dropped");
            return Ok(DeliveryReport::empty(channel_id.clone()));
        }

        let outcomes = join_all(
            recipients
                .iter()
                .map(|connection| self.deliver_to(connection, frame.clone())),
        )
        .await;

        let mut report = DeliveryReport {
            channel_id: channel_id.clone(),
            recipients: recipients.len(),
            delivered: 0,
            failures: Vec::new(),
        };
        for (connection, outcome) in recipients.iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.delivered += 1,
                Err(error) => report.failures.push(DeliveryFailure::new(connection, error)),
            }
        }

        debug!(
            channel_id = %channel_id,
            recipients = report.recipients,
            delivered = report.delivered,
            failed = report.failed(),
            "Broadcast complete"
        );
        Ok(report)
    }

    async fn deliver_to(&self, connection: &Arc<Connection>, frame: Bytes) -> Result<(), DeliveryError> {
        let result = match tokio::time::timeout(self.send_timeout, connection.deliver(frame)).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout {
                after: self.send_timeout,
            }),
        };

        match &result {
            Ok(()) => {}
            Err(DeliveryError::AlreadyClosed) => {
                debug!(
                    connection_id = %connection.id(),
                    "Subscriber closed before delivery"
                );
            }
            Err(error) => {
                warn!(
                    connection_id = %connection.id(),
                    channel_id = %connection.channel_id(),
                    user_id = %connection.user_id(),
                    session_id = %connection.session_id(),
                    error = %error,
                    "Delivery failed, evicting subscriber"
                );
                self.registry.deregister(connection);
            }
        }
        result
    }
}
