//! HTTP adapter for channel ingest and subscriber streams.

pub mod dto;
pub mod handlers;
mod routes;

pub use dto::{ErrorResponse, EventsQuery, PostMessageRequest, PostMessageResponse};
pub use handlers::ChannelApiError;
pub use routes::channel_routes;
