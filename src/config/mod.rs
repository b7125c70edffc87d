//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `REALTALK_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use realtalk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod error;
mod hub;
mod server;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use hub::HubConfig;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// development setup. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, environment, logging, shutdown)
    #[serde(default)]
    pub server: ServerConfig,

    /// Fan-out tuning
    #[serde(default)]
    pub hub: HubConfig,

    /// Storage backend checked at startup
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `REALTALK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `REALTALK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `REALTALK__HUB__SEND_TIMEOUT_MS=2000` -> `hub.send_timeout_ms = 2000`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REALTALK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.hub.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "REALTALK__SERVER__PORT",
        "REALTALK__SERVER__ENVIRONMENT",
        "REALTALK__SERVER__SHUTDOWN_GRACE_SECS",
        "REALTALK__HUB__SEND_TIMEOUT_MS",
        "REALTALK__HUB__SINK_BUFFER",
        "REALTALK__STORAGE__URL",
        "REALTALK__STORAGE__REQUIRED",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.hub.send_timeout_ms, 5000);
        assert_eq!(config.storage.url, "redis://localhost:6379");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("REALTALK__SERVER__PORT", "3000");
        env::set_var("REALTALK__SERVER__SHUTDOWN_GRACE_SECS", "3");
        env::set_var("REALTALK__HUB__SEND_TIMEOUT_MS", "250");
        env::set_var("REALTALK__HUB__SINK_BUFFER", "8");
        env::set_var("REALTALK__STORAGE__URL", "redis://cache:6379");
        env::set_var("REALTALK__STORAGE__REQUIRED", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.shutdown_grace(), Duration::from_secs(3));
        assert_eq!(config.hub.send_timeout(), Duration::from_millis(250));
        assert_eq!(config.hub.sink_buffer, 8);
        assert_eq!(config.storage.url, "redis://cache:6379");
        assert!(config.storage.required);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("REALTALK__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_validate_reports_first_bad_section() {
        let mut config = AppConfig::default();
        config.hub.sink_buffer = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidSinkBuffer));
    }
}
