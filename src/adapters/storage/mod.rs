//! Storage adapters - startup connectivity checks.

mod redis;

pub use self::redis::RedisStorageHealth;

use tracing::{info, warn};

use crate::ports::{StorageError, StorageHealth};

/// Probe the storage backend once at startup.
///
/// A failure is returned only when `required` is set; otherwise it is logged
/// and the hub starts anyway.
pub async fn check_storage(health: &dyn StorageHealth, required: bool) -> Result<(), StorageError> {
    match health.ping().await {
        Ok(()) => {
            info!(backend = health.name(), "Storage reachable");
            Ok(())
        }
        Err(e) if required => Err(e),
        Err(e) => {
            warn!(backend = health.name(), error = %e, "Storage unreachable, continuing without it");
            Ok(())
        }
    }
}
