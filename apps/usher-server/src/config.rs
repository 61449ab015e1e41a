//! Server configuration module.
//!
//! Supports configuration via environment variables:
//!
//! ```bash
//! # Require x-api-key on GET/POST/DELETE (PUT stays public so invitees
//! # can confirm without credentials)
//! USHER_ADMIN_API_KEY=secret
//!
//! # Minutes between expiry sweep runs under `serve`; 0 disables the
//! # in-process scheduler
//! USHER_SWEEP_INTERVAL_MINUTES=60
//! ```

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Sweep cadence when `USHER_SWEEP_INTERVAL_MINUTES` is unset.
pub const DEFAULT_SWEEP_INTERVAL_MINUTES: u64 = 60;

/// Server configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Admin key required on GET/POST/DELETE when set.
    pub admin_api_key: Option<String>,
    /// Minutes between sweep runs; 0 disables the scheduler.
    pub sweep_interval_minutes: u64,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid USHER_SWEEP_INTERVAL_MINUTES: {0}. Expected a non-negative integer")]
    InvalidSweepInterval(String),
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let admin_api_key = env::var("USHER_ADMIN_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let sweep_interval_minutes = match env::var("USHER_SWEEP_INTERVAL_MINUTES") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidSweepInterval(raw))?,
            Err(_) => DEFAULT_SWEEP_INTERVAL_MINUTES,
        };

        Ok(Self {
            admin_api_key,
            sweep_interval_minutes,
        })
    }

    /// Scheduler period, or `None` when the scheduler is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        if self.sweep_interval_minutes == 0 {
            None
        } else {
            Some(Duration::from_secs(self.sweep_interval_minutes * 60))
        }
    }
}
