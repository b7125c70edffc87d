//! Storage configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Storage backend probed at startup
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Redis connection URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Connect-and-ping timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Refuse to start when the backend is unreachable
    #[serde(default)]
    pub required: bool,
}

impl StorageConfig {
    /// Get timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE_URL"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::InvalidStorageUrl);
        }
        if self.connect_timeout_secs == 0 {
            return Err(ValidationError::InvalidStorageTimeout);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            connect_timeout_secs: default_connect_timeout(),
            required: false,
        }
    }
}

fn default_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_connect_timeout() -> u64 {
    20
}
