//! Redis storage health check.
//!
//! Opens a multiplexed connection and sends `PING`, bounded by the configured
//! connect timeout.

use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{StorageError, StorageHealth};

/// Probes a Redis server.
#[derive(Clone)]
pub struct RedisStorageHealth {
    client: redis::Client,
    timeout: Duration,
}

impl RedisStorageHealth {
    /// Create a probe for `url`.
    ///
    /// # Errors
    ///
    /// `StorageError::Unavailable` if the URL cannot be parsed.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)
            .map_err(|e: redis::RedisError| StorageError::Unavailable(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    async fn ping_once(&self) -> Result<(), StorageError> {
        let mut conn = self
            .client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e: redis::RedisError| StorageError::Unavailable(e.to_string()))?;

        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e: redis::RedisError| StorageError::Unavailable(e.to_string()))?;

        if reply != "PONG" {
            return Err(StorageError::Unavailable(format!(
                "unexpected PING reply: {reply}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageHealth for RedisStorageHealth {
    async fn ping(&self) -> Result<(), StorageError> {
        tokio::time::timeout(self.timeout, self.ping_once())
            .await
            .map_err(|_| StorageError::Timeout(self.timeout.as_secs()))?
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
