//! Hub configuration

use serde::Deserialize;
use std::time::Duration;

use crate::application::hub::HubSettings;

use super::error::ValidationError;

/// Fan-out tuning
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Per-subscriber send timeout in milliseconds
    #[serde(default = "default_send_timeout")]
    pub send_timeout_ms: u64,

    /// Frames buffered per subscriber stream before sends start waiting
    #[serde(default = "default_sink_buffer")]
    pub sink_buffer: usize,
}

impl HubConfig {
    /// Get send timeout as Duration
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    /// Runtime settings for [`crate::application::Hub`]
    pub fn settings(&self) -> HubSettings {
        HubSettings {
            send_timeout: self.send_timeout(),
        }
    }

    /// Validate hub configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.send_timeout_ms == 0 || self.send_timeout_ms > 60_000 {
            return Err(ValidationError::InvalidSendTimeout);
        }
        if self.sink_buffer == 0 {
            return Err(ValidationError::InvalidSinkBuffer);
        }
        Ok(())
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            send_timeout_ms: default_send_timeout(),
            sink_buffer: default_sink_buffer(),
        }
    }
}

fn default_send_timeout() -> u64 {
    5000
}

fn default_sink_buffer() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_config_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.send_timeout(), Duration::from_secs(5));
        assert_eq!(config.sink_buffer, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_settings_carry_timeout() {
        let config = HubConfig {
            send_timeout_ms: 750,
            ..Default::default()
        };
        assert_eq!(config.settings().send_timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = HubConfig {
            send_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSendTimeout));
    }

    #[test]
    fn test_validation_zero_buffer() {
        let config = HubConfig {
            sink_buffer: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSinkBuffer));
    }
}
