//! RealTalk - Real-time channel fan-out hub
//!
//! Producers post events to a channel; every live subscriber of that channel
//! receives them over a Server-Sent-Events stream keyed by
//! (channel, user, session). Delivery is best-effort and in-memory.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
