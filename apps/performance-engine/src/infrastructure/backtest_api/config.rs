//! Backtest service adapter configuration.

use std::time::Duration;

/// Default API root of a locally running service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001/api/v1";

/// Configuration for the HTTP backtest service adapter.
#[derive(Debug, Clone)]
pub struct BacktestApiConfig {
    /// API root including the version prefix, without a trailing slash.
    pub base_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Retry policy for idempotent requests.
    pub retry: RetryConfig,
}

impl BacktestApiConfig {
    /// Create a configuration for `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(120),
            retry: RetryConfig::default(),
        }
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Absolute URL of an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for BacktestApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, the first one included.
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_service() {
        let config = BacktestApiConfig::default();
        assert_eq!(config.url("/health"), "http://localhost:8001/api/v1/health");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let config = BacktestApiConfig::new(" http://svc:9000/api/v1/ ");
        assert_eq!(config.url("backtest/run"), "http://svc:9000/api/v1/backtest/run");
    }

    #[test]
    fn builder_overrides() {
        let config = BacktestApiConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_retry(RetryConfig {
                max_attempts: 1,
                ..RetryConfig::default()
            });
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 1);
    }
}
