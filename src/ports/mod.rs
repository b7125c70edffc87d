//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the hub and the outside world. Adapters implement these ports.
//!
//! - `EventSink` - Push handle for one subscriber's stream (SSE body, tests)
//! - `StorageHealth` - Startup connectivity check for the storage backend

mod event_sink;
mod storage_health;

pub use event_sink::{EventSink, SinkError};
pub use storage_health::{StorageError, StorageHealth};
