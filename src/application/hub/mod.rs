//! The fan-out hub: connection registry, subscription lifecycle and
//! broadcast engine, wired together by [`Hub`].

mod broadcast;
mod connection;
mod lifecycle;
mod registry;
mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcast::{BroadcastEngine, DeliveryFailure, DeliveryReport};
pub use connection::Connection;
pub use lifecycle::{CloseReason, Subscription, SubscriptionManager};
pub use registry::ConnectionRegistry;
pub use service::{Hub, HubSettings, ShutdownReport};
