//! Configuration module for the performance engine.
//!
//! YAML configuration with environment variable interpolation and
//! validation. Every section is optional and falls back to defaults.
//!
//! # Usage
//!
//! ```rust,ignore
//! use performance_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! println!("history file: {}", config.trade_store.path().display());
//! ```

mod backtest_service;
mod observability;
mod trade_store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use backtest_service::{BacktestServiceConfig, RetrySettings};
pub use observability::{LogFormat, LoggingConfig, MetricsSettings, ObservabilityConfig};
pub use trade_store::TradeStoreConfig;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Environment variable overriding the configuration path.
pub const CONFIG_PATH_ENV: &str = "PERFORMANCE_ENGINE_CONFIG";

/// Largest broker clock offset accepted, in hours.
const MAX_OFFSET_HOURS: i64 = 14;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Trade history file.
    #[serde(default)]
    pub trade_store: TradeStoreConfig,
    /// Remote backtest service.
    #[serde(default)]
    pub backtest_service: BacktestServiceConfig,
    /// Logging and metrics.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// `path` defaults to `$PERFORMANCE_ENGINE_CONFIG`, then `config.yaml`. A
/// missing default file yields the default configuration; a missing explicit
/// file is an error.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let from_env = std::env::var(CONFIG_PATH_ENV).ok().filter(|p| !p.is_empty());
    let explicit = path.map(str::to_string).or(from_env);
    let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if explicit.is_none() && e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path, "No config file found, using defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(ConfigError::ReadError { path, source: e });
        }
    };

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. A missing variable
/// without a default becomes the empty string.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.backtest_service.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "backtest_service.base_url must not be empty".to_string(),
        ));
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "backtest_service.base_url must be an http(s) URL, got '{base_url}'"
        )));
    }

    if config.backtest_service.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "backtest_service.poll_interval_ms must be positive".to_string(),
        ));
    }

    if config.backtest_service.retry.multiplier < 1.0 {
        return Err(ConfigError::ValidationError(
            "backtest_service.retry.multiplier must be at least 1.0".to_string(),
        ));
    }

    if config.trade_store.watch_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "trade_store.watch_interval_ms must be positive".to_string(),
        ));
    }

    if config.trade_store.broker_utc_offset_hours.abs() > MAX_OFFSET_HOURS {
        return Err(ConfigError::ValidationError(format!(
            "trade_store.broker_utc_offset_hours must be within ±{MAX_OFFSET_HOURS}"
        )));
    }

    if config.trade_store.file_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "trade_store.file_name must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.trade_store.file_name, "trade_history.json");
        assert_eq!(config.trade_store.broker_utc_offset_hours, 2);
        assert_eq!(config.trade_store.initial_balance, dec!(10000));
        assert_eq!(config.backtest_service.base_url, "http://localhost:8001/api/v1");
        assert_eq!(config.backtest_service.request_timeout_secs, 120);
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert!(!config.observability.metrics.enabled);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_document_is_default() {
        let config = load_config_from_string("").unwrap();
        assert_eq!(config.trade_store.watch_interval_ms, 1000);
    }

    #[test]
    fn full_config_parse() {
        let yaml = r#"
trade_store:
  data_dir: "/var/lib/trader"
  file_name: "history.json"
  broker_utc_offset_hours: 3
  watch_interval_ms: 500
  initial_balance: 25000

backtest_service:
  base_url: "https://backtest.internal/api/v1"
  request_timeout_secs: 30
  poll_interval_ms: 250
  max_poll_duration_secs: 0
  retry:
    max_attempts: 5
    initial_backoff_ms: 50
    max_backoff_ms: 2000
    multiplier: 1.5

observability:
  logging:
    level: debug
    format: pretty
  metrics:
    enabled: true
    listen_addr: "127.0.0.1:9191"
"#;
        let config = load_config_from_string(yaml).unwrap();

        assert_eq!(
            config.trade_store.path(),
            std::path::PathBuf::from("/var/lib/trader/history.json")
        );
        assert_eq!(config.trade_store.clock().offset(), chrono::TimeDelta::hours(3));
        assert_eq!(config.trade_store.initial_balance, dec!(25000));

        let poll = config.backtest_service.poll_settings();
        assert_eq!(poll.interval, Duration::from_millis(250));
        assert_eq!(poll.max_duration, None);

        let api = config.backtest_service.api_config();
        assert_eq!(api.timeout, Duration::from_secs(30));
        assert_eq!(api.retry.max_attempts, 5);

        assert_eq!(config.observability.logging.format, LogFormat::Pretty);
        assert!(config.observability.metrics.enabled);
    }

    #[test]
    fn example_config_parses() {
        let config = load_config_from_string(include_str!("../../config.example.yaml")).unwrap();
        assert_eq!(config.trade_store.file_name, "trade_history.json");
        assert_eq!(config.backtest_service.retry.max_attempts, 3);
    }

    #[test]
    fn default_poll_duration_is_bounded() {
        let poll = Config::default().backtest_service.poll_settings();
        assert_eq!(poll.max_duration, Some(Duration::from_secs(1800)));
    }

    #[test]
    fn env_var_with_default_when_missing() {
        let input = "base_url: ${PERF_ENGINE_TEST_NONEXISTENT_VAR:-http://localhost:9000}";
        assert_eq!(interpolate_env_vars(input), "base_url: http://localhost:9000");
    }

    #[test]
    fn env_var_without_default_becomes_empty() {
        let input = "file_name: ${PERF_ENGINE_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "file_name: ");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax
    fn env_var_with_default_uses_existing() {
        let result = interpolate_env_vars("path: ${PATH:-default}");
        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let yaml = "backtest_service:\n  base_url: \"ftp://example.com\"\n";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for ftp base url");
        };
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn rejects_zero_intervals() {
        let yaml = "backtest_service:\n  poll_interval_ms: 0\n";
        assert!(load_config_from_string(yaml).is_err());

        let yaml = "trade_store:\n  watch_interval_ms: 0\n";
        assert!(load_config_from_string(yaml).is_err());
    }

    #[test]
    fn rejects_out_of_range_offset() {
        let yaml = "trade_store:\n  broker_utc_offset_hours: 20\n";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for offset");
        };
        assert!(err.to_string().contains("broker_utc_offset_hours"));
    }

    #[test]
    fn rejects_shrinking_backoff() {
        let yaml = "backtest_service:\n  retry:\n    multiplier: 0.5\n";
        assert!(load_config_from_string(yaml).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = load_config(Some("/nonexistent/performance-engine.yaml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
