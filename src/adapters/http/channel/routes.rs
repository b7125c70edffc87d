//! Axum router configuration for channel endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::AppState;

use super::handlers::{post_message, stream_events};

/// Create the channel API router.
///
/// # Routes
/// - `POST /channel/:channel_id/messages` - Broadcast an event to a channel
/// - `GET /events` - Open a subscriber event stream
pub fn channel_routes() -> Router<AppState> {
    Router::new()
        .route("/channel/:channel_id/messages", post(post_message))
        .route("/events", get(stream_events))
}
