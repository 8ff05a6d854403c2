//! Prometheus metrics for the performance engine.
//!
//! Recording functions are always safe to call; without an installed
//! recorder they are no-ops.
//!
//! # Example
//!
//! ```ignore
//! use performance_engine::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_backtest_poll("running");
//! ```

use std::net::{Ipv4Addr, SocketAddr};

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for backtest job durations (in seconds).
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)),
            // Backtests run from seconds to tens of minutes
            duration_buckets: vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0],
        }
    }
}

impl MetricsConfig {
    /// Configuration with a custom listen address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Install the Prometheus recorder and start its HTTP listener (`/metrics`).
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.duration_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Trade Store Metrics
// ============================================================================

/// Record a successful trade-history load.
pub fn record_trades_loaded(count: usize) {
    counter!("trade_store_reloads_total").increment(1);
    gauge!("trade_store_trades").set(count as f64);
}

/// Record a failed trade-history load.
///
/// * `reason` - `"io"` or `"parse"`
pub fn record_trade_store_failure(reason: &str) {
    counter!("trade_store_reload_failures_total", "reason" => reason.to_string()).increment(1);
}

// ============================================================================
// Backtest Metrics
// ============================================================================

/// Record one status poll.
///
/// * `status` - Status reported by the service
pub fn record_backtest_poll(status: &str) {
    counter!("backtest_status_polls_total", "status" => status.to_string()).increment(1);
}

/// Record a finished backtest job.
///
/// * `outcome` - `"complete"`, `"failed"`, `"cancelled"`, `"timed_out"`, or `"error"`
/// * `duration_seconds` - Time from submission to the terminal outcome
pub fn record_backtest_job(outcome: &str, duration_seconds: f64) {
    counter!("backtest_jobs_total", "outcome" => outcome.to_string()).increment(1);
    histogram!("backtest_job_duration_seconds", "outcome" => outcome.to_string())
        .record(duration_seconds);
}
