//! Application layer - the hub core and the command handlers built on it.

pub mod handlers;
pub mod hub;

pub use handlers::{PostMessageCommand, PostMessageHandler};
pub use hub::{
    CloseReason, DeliveryReport, Hub, HubSettings, ShutdownReport, Subscription,
};
