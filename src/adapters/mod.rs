//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the hub to external systems:
//! - `http` - Axum routes for ingest, streams, posts and health
//! - `sse` - Server-Sent Events sink and response body
//! - `storage` - Startup storage connectivity check (Redis)

pub mod http;
pub mod sse;
pub mod storage;

pub use http::{app_router, with_middleware, AppState};
pub use sse::{open_event_stream, ChannelSink};
pub use storage::{check_storage, RedisStorageHealth};
