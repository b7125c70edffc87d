//! Application handlers.
//!
//! Command handlers that orchestrate hub operations for the transport layer.

pub mod post_message;

pub use post_message::{PostMessageCommand, PostMessageHandler};
