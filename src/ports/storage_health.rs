//! StorageHealth port - Connectivity check for the storage backend.
//!
//! The hub keeps no message data in storage. The backend is only probed at
//! startup so operators learn early that it is unreachable.

use async_trait::async_trait;

/// Errors from probing the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Could not connect or the backend rejected the probe.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The probe did not complete in time.
    #[error("Storage check timed out after {0} seconds")]
    Timeout(u64),
}

/// Port for checking that the storage backend answers.
#[async_trait]
pub trait StorageHealth: Send + Sync {
    /// Probe the backend once.
    async fn ping(&self) -> Result<(), StorageError>;

    /// Human-readable backend name for logs.
    fn name(&self) -> &'static str;
}
