//! Backtest service connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::services::PollSettings;
use crate::infrastructure::backtest_api::{BacktestApiConfig, RetryConfig};

/// Backtest service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestServiceConfig {
    /// API root, including the version prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout (seconds).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Delay between status polls (milliseconds).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Give up on a job after this long (seconds); 0 polls forever.
    #[serde(default = "default_max_poll_duration_secs")]
    pub max_poll_duration_secs: u64,
    /// Retry policy for idempotent requests.
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Default for BacktestServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_duration_secs: default_max_poll_duration_secs(),
            retry: RetrySettings::default(),
        }
    }
}

impl BacktestServiceConfig {
    /// HTTP adapter configuration.
    #[must_use]
    pub fn api_config(&self) -> BacktestApiConfig {
        BacktestApiConfig::new(&self.base_url)
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_retry(RetryConfig {
                max_attempts: self.retry.max_attempts,
                initial_backoff: Duration::from_millis(self.retry.initial_backoff_ms),
                max_backoff: Duration::from_millis(self.retry.max_backoff_ms),
                multiplier: self.retry.multiplier,
            })
    }

    /// Job polling settings.
    #[must_use]
    pub const fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_duration: if self.max_poll_duration_secs == 0 {
                None
            } else {
                Some(Duration::from_secs(self.max_poll_duration_secs))
            },
        }
    }
}

/// Retry policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Attempts including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// First backoff (milliseconds).
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Backoff cap (milliseconds).
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// Backoff growth factor.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            multiplier: default_multiplier(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8001/api/v1".to_string()
}

const fn default_request_timeout_secs() -> u64 {
    120
}

const fn default_poll_interval_ms() -> u64 {
    1000
}

const fn default_max_poll_duration_secs() -> u64 {
    1800
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    100
}

const fn default_max_backoff_ms() -> u64 {
    10_000
}

const fn default_multiplier() -> f64 {
    2.0
}
