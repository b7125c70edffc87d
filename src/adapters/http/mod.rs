//! HTTP adapters - REST API and event stream endpoints.
//!
//! # Routes
//! - `POST /api/v1/channel/:channel_id/messages` - Producer ingest
//! - `GET /api/v1/events` - Subscriber event stream (SSE)
//! - `GET /api/v1/posts` - Static post catalogue
//! - `GET /health` - Liveness and connection counts

pub mod channel;
pub mod health;
pub mod posts;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::application::handlers::PostMessageHandler;
use crate::application::hub::Hub;

pub use channel::{channel_routes, ChannelApiError, ErrorResponse};
pub use health::HealthResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state.
///
/// Cloned for each request; the hub is shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Hub>,
    /// Frames buffered per subscriber stream.
    pub sink_buffer: usize,
}

impl AppState {
    pub fn new(hub: Arc<Hub>, sink_buffer: usize) -> Self {
        Self { hub, sink_buffer }
    }

    pub fn post_message_handler(&self) -> PostMessageHandler {
        PostMessageHandler::new(Arc::clone(&self.hub))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Router
// ════════════════════════════════════════════════════════════════════════════════

/// Build the complete application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            channel_routes().route("/posts", get(posts::list_posts)),
        )
        .route("/health", get(health::health))
        .with_state(state)
}

/// Wrap the router with request tracing and CORS.
///
/// An empty origin list allows any origin.
pub fn with_middleware(router: Router, cors_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    }
    .allow_methods(Any)
    .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}
