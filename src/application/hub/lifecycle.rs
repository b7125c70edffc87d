//! Subscription lifecycle - admit a subscriber, keep it registered while the
//! stream is open, and remove it exactly once when the stream ends.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::foundation::{ChannelId, SessionId, UserId};
use crate::domain::messaging::HubError;
use crate::ports::EventSink;

use super::connection::Connection;
use super::registry::ConnectionRegistry;

/// Why a subscription ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The client went away or the caller's disconnect signal fired.
    Disconnected,
    /// The hub closed the connection after a failed delivery.
    Evicted,
    /// The hub is shutting down.
    Shutdown,
}

/// Admits subscribers into the registry.
pub struct SubscriptionManager {
    registry: Arc<ConnectionRegistry>,
    shutdown: CancellationToken,
}

impl SubscriptionManager {
    pub fn new(registry: Arc<ConnectionRegistry>, shutdown: CancellationToken) -> Self {
        Self { registry, shutdown }
    }

    /// Validate the identifiers and register an active connection.
    ///
    /// Identifiers are checked in channel, user, session order; blank ones
    /// are rejected before the registry is touched.
    ///
    /// # Errors
    ///
    /// - `MissingIdentifier` if an identifier is empty or whitespace
    /// - `ShuttingDown` once hub shutdown has begun
    /// - `DuplicateSession` if the triple is already live
    pub fn open(
        &self,
        channel_id: &str,
        user_id: &str,
        session_id: &str,
        sink: Arc<dyn EventSink>,
    ) -> Result<Subscription, HubError> {
        let channel_id = ChannelId::new(channel_id)?;
        let user_id = UserId::new(user_id)?;
        let session_id = SessionId::new(session_id)?;

        if self.shutdown.is_cancelled() {
            return Err(HubError::ShuttingDown);
        }

        let connection = self
            .registry
            .register(channel_id, user_id, session_id, sink)
            .map_err(|e| {
                debug!(error = %e, "Subscription rejected");
                e
            })?;

        // Shutdown cancels before it enumerates connections, so a registration
        // that raced past the first check is either seen here or by shutdown.
        if self.shutdown.is_cancelled() {
            self.registry.deregister(&connection);
            return Err(HubError::ShuttingDown);
        }

        info!(
            connection_id = %connection.id(),
            channel_id = %connection.channel_id(),
            user_id = %connection.user_id(),
            session_id = %connection.session_id(),
            "Subscriber connected"
        );

        Ok(Subscription {
            connection,
            registry: Arc::clone(&self.registry),
            shutdown: self.shutdown.clone(),
        })
    }

    /// Open a subscription and hold it until `disconnected` resolves, the
    /// connection is evicted, or the hub shuts down.
    pub async fn subscribe<F>(
        &self,
        channel_id: &str,
        user_id: &str,
        session_id: &str,
        sink: Arc<dyn EventSink>,
        disconnected: F,
    ) -> Result<CloseReason, HubError>
    where
        F: Future<Output = ()>,
    {
        let subscription = self.open(channel_id, user_id, session_id, sink)?;
        Ok(subscription.run_until(disconnected).await)
    }
}

/// A registered subscriber. Dropping it unregisters the connection.
#[derive(Debug)]
pub struct Subscription {
    connection: Arc<Connection>,
    registry: Arc<ConnectionRegistry>,
    shutdown: CancellationToken,
}

impl Subscription {
    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// Wait for the first end-of-stream signal, then unregister.
    pub async fn run_until<F>(self, disconnected: F) -> CloseReason
    where
        F: Future<Output = ()>,
    {
        let reason = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => CloseReason::Shutdown,
            _ = self.connection.closed() => CloseReason::Evicted,
            _ = disconnected => CloseReason::Disconnected,
        };

        self.close();
        let connected_ms =
            (Utc::now() - *self.connection.opened_at().as_datetime()).num_milliseconds();
        info!(
            connection_id = %self.connection.id(),
            channel_id = %self.connection.channel_id(),
            reason = ?reason,
            connected_ms,
            "Subscriber disconnected"
        );
        reason
    }

    /// Unregister now. Safe to call any number of times.
    pub fn close(&self) -> bool {
        self.registry.deregister(&self.connection)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}
