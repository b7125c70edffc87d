//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Shutdown grace period must be between 1 and 300 seconds")]
    InvalidShutdownGrace,

    #[error("Send timeout must be between 1 and 60000 milliseconds")]
    InvalidSendTimeout,

    #[error("Sink buffer must hold at least one frame")]
    InvalidSinkBuffer,

    #[error("Invalid storage URL format")]
    InvalidStorageUrl,

    #[error("Invalid storage connect timeout")]
    InvalidStorageTimeout,
}
