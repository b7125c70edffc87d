//! Hub - the entry point the transport layer talks to.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::foundation::ChannelId;
use crate::domain::messaging::{Event, HubError};
use crate::ports::EventSink;

use super::broadcast::{BroadcastEngine, DeliveryReport};
use super::lifecycle::{CloseReason, Subscription, SubscriptionManager};
use super::registry::ConnectionRegistry;

/// Runtime knobs for the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubSettings {
    /// Longest a single subscriber send may take before it is evicted.
    pub send_timeout: Duration,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_millis(5000),
        }
    }
}

/// What happened to the subscribers that were live when shutdown began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    pub live_at_start: usize,
    pub force_closed: usize,
}

/// Owns the registry and wires the lifecycle manager and broadcast engine
/// to it.
pub struct Hub {
    registry: Arc<ConnectionRegistry>,
    subscriptions: SubscriptionManager,
    broadcaster: BroadcastEngine,
    shutdown: CancellationToken,
}

impl Hub {
    pub fn new(settings: HubSettings) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let shutdown = CancellationToken::new();
        Self {
            subscriptions: SubscriptionManager::new(Arc::clone(&registry), shutdown.clone()),
            broadcaster: BroadcastEngine::new(Arc::clone(&registry), settings.send_timeout),
            registry,
            shutdown,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// See [`SubscriptionManager::open`].
    pub fn open(
        &self,
        channel_id: &str,
        user_id: &str,
        session_id: &str,
        sink: Arc<dyn EventSink>,
    ) -> Result<Subscription, HubError> {
        self.subscriptions.open(channel_id, user_id, session_id, sink)
    }

    /// See [`SubscriptionManager::subscribe`].
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
        self.subscriptions
            .subscribe(channel_id, user_id, session_id, sink, disconnected)
            .await
    }

    /// Stamp `event` and deliver it to every subscriber of `channel_id`.
    ///
    /// # Errors
    ///
    /// - `MissingIdentifier` if the channel id is blank
    /// - `Encoding` if the event cannot be encoded
    pub async fn broadcast(&self, channel_id: &str, event: Event) -> Result<DeliveryReport, HubError> {
        let channel_id = ChannelId::new(channel_id)?;
        self.broadcaster.broadcast(&channel_id, &event.stamped()).await
    }

    /// Stop admitting subscribers, let open streams end within `grace`, then
    /// close whatever is left.
    pub async fn shutdown(&self, grace: Duration) -> ShutdownReport {
        let live_at_start = self.registry.connection_count();
        info!(
            live = live_at_start,
            grace_ms = grace.as_millis() as u64,
            "Hub shutting down"
        );
        self.shutdown.cancel();

        let drained = tokio::time::timeout(grace, self.drained()).await.is_ok();

        let mut force_closed = 0;
        if !drained {
            for connection in self.registry.connections() {
                if self.registry.deregister(&connection) {
                    force_closed += 1;
                }
            }
            warn!(force_closed, "Grace period elapsed, closed remaining subscribers");
        }

        info!(live = live_at_start, force_closed, "Hub stopped");
        ShutdownReport {
            live_at_start,
            force_closed,
        }
    }

    async fn drained(&self) {
        loop {
            let emptied = self.registry.channel_emptied();
            tokio::pin!(emptied);
            emptied.as_mut().enable();

            if self.registry.is_empty() {
                return;
            }
            emptied.await;
        }
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(HubSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::hub::test_support::{FailingSink, RecordingSink};
    use crate::domain::foundation::{SessionId, UserId};

    fn event(user: &str, body: &str) -> Event {
        Event::new(UserId::new(user).unwrap(), body)
    }

    fn body_of(frame: &str) -> String {
        let data = frame
            .lines()
            .find_map(|l| l.strip_prefix("data: "))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(data).unwrap();
        value["message"]["body"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn unregistered_subscriber_misses_later_broadcasts() {
        let hub = Hub::default();
        let s1 = RecordingSink::shared();
        let s2 = RecordingSink::shared();
        let _a = hub.open("c1", "u1", "s1", s1.clone()).unwrap();
        let _b = hub.open("c1", "u2", "s2", s2.clone()).unwrap();

        hub.broadcast("c1", event("u1", "hi")).await.unwrap();
        let (c, u, s) = (
            ChannelId::new("c1").unwrap(),
            UserId::new("u1").unwrap(),
            SessionId::new("s1").unwrap(),
        );
        hub.registry().unregister(&c, &u, &s);
        hub.broadcast("c1", event("u1", "bye")).await.unwrap();

        let bodies = |sink: &RecordingSink| -> Vec<String> {
            sink.texts().iter().map(|f| body_of(f)).collect()
        };
        assert_eq!(bodies(&s1), vec!["hi"]);
        assert_eq!(bodies(&s2), vec!["hi", "bye"]);
    }

    #[tokio::test]
    async fn sessions_of_one_user_receive_in_order() {
        let hub = Hub::default();
        let s1 = RecordingSink::shared();
        let s2 = RecordingSink::shared();
        let _a = hub.open("room", "alice", "tab-1", s1.clone()).unwrap();
        let _b = hub.open("room", "alice", "tab-2", s2.clone()).unwrap();

        for body in ["one", "two", "three"] {
            hub.broadcast("room", event("bob", body)).await.unwrap();
        }

        for sink in [&s1, &s2] {
            let bodies: Vec<_> = sink.texts().iter().map(|f| body_of(f)).collect();
            assert_eq!(bodies, vec!["one", "two", "three"]);
        }
    }

    #[tokio::test]
    async fn missing_user_leaves_channel_empty() {
        let hub = Hub::default();

        let err = hub.open("c1", "", "s1", RecordingSink::shared()).unwrap_err();

        assert_eq!(err, HubError::missing_identifier("user_id"));
        assert!(hub.registry().snapshot(&ChannelId::new("c1").unwrap()).is_empty());
    }

    #[tokio::test]
    async fn broadcast_stamps_the_event() {
        let hub = Hub::default();
        let sink = RecordingSink::shared();
        let _sub = hub.open("room", "alice", "tab-1", sink.clone()).unwrap();

        hub.broadcast("room", event("bob", "hi")).await.unwrap();

        assert!(sink.texts()[0].contains("\"timestamp\":"));
    }

    #[tokio::test]
    async fn broadcast_to_blank_channel_is_rejected() {
        let hub = Hub::default();

        let err = hub.broadcast("   ", event("bob", "hi")).await.unwrap_err();

        assert_eq!(err, HubError::missing_identifier("channel_id"));
    }

    #[tokio::test]
    async fn closed_subscriber_stops_receiving() {
        let hub = Hub::default();
        let sink = RecordingSink::shared();
        let sub = hub.open("room", "alice", "tab-1", sink.clone()).unwrap();

        hub.broadcast("room", event("bob", "one")).await.unwrap();
        drop(sub);
        let report = hub.broadcast("room", event("bob", "two")).await.unwrap();

        assert_eq!(report.recipients, 0);
        assert_eq!(sink.frames().len(), 1);
    }

    #[tokio::test]
    async fn evicted_subscriber_is_gone_for_next_broadcast() {
        let hub = Hub::default();
        let _good = hub.open("room", "alice", "tab-1", RecordingSink::shared()).unwrap();
        let _bad = hub.open("room", "carol", "tab-1", FailingSink::shared("gone")).unwrap();

        let first = hub.broadcast("room", event("bob", "one")).await.unwrap();
        let second = hub.broadcast("room", event("bob", "two")).await.unwrap();

        assert_eq!((first.recipients, first.failed()), (2, 1));
        assert_eq!((second.recipients, second.failed()), (1, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_drains_cooperative_subscribers() {
        let hub = Arc::new(Hub::default());
        let sub = hub.open("room", "alice", "tab-1", RecordingSink::shared()).unwrap();
        let task = tokio::spawn(sub.run_until(std::future::pending()));

        let report = hub.shutdown(Duration::from_secs(1)).await;

        assert_eq!(report, ShutdownReport { live_at_start: 1, force_closed: 0 });
        assert_eq!(task.await.unwrap(), CloseReason::Shutdown);
        assert!(hub.registry().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_returns_when_last_subscriber_leaves() {
        let hub = Hub::default();
        let held = hub.open("room", "alice", "tab-1", RecordingSink::shared()).unwrap();
        let leaver = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            drop(held);
        });

        let started = tokio::time::Instant::now();
        let report = hub.shutdown(Duration::from_secs(5)).await;

        assert_eq!(report, ShutdownReport { live_at_start: 1, force_closed: 0 });
        assert!(started.elapsed() < Duration::from_secs(1));
        leaver.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_force_closes_after_grace() {
        let hub = Hub::default();
        let sink = RecordingSink::shared();
        // Held but never driven, so it cannot react to the shutdown signal.
        let _held = hub.open("room", "alice", "tab-1", sink.clone()).unwrap();

        let report = hub.shutdown(Duration::from_millis(100)).await;

        assert_eq!(report, ShutdownReport { live_at_start: 1, force_closed: 1 });
        assert!(hub.registry().is_empty());
        assert!(sink.is_closed());
    }

    #[tokio::test]
    async fn no_new_subscribers_after_shutdown() {
        let hub = Hub::default();
        hub.shutdown(Duration::ZERO).await;

        assert!(hub.is_shutting_down());
        let err = hub.open("room", "alice", "tab-1", RecordingSink::shared()).unwrap_err();
        assert_eq!(err, HubError::ShuttingDown);
    }
}
