//! Backtest Service Port (Driven Port)
//!
//! Interface to the remote backtest compute service. The service runs the
//! simulation; this side only submits, polls, and fetches.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{BacktestSubmission, BacktestTask, JobKind, TaskStatus};

/// `GET /health` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Service status string (`healthy` when up).
    pub status: String,
    /// Service version.
    #[serde(default)]
    pub version: String,
    /// Seconds since the service started.
    #[serde(default)]
    pub uptime_seconds: f64,
}

impl HealthStatus {
    /// Whether the service reports itself healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// `GET /info` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service version.
    #[serde(default)]
    pub version: String,
    /// Feature flags.
    #[serde(default)]
    pub features: Vec<String>,
    /// Symbols with data.
    #[serde(default)]
    pub supported_symbols: Vec<String>,
    /// Strategy names accepted in requests.
    #[serde(default)]
    pub supported_strategies: Vec<String>,
    /// Data coverage per symbol, free-form.
    #[serde(default)]
    pub data_available: BTreeMap<String, serde_json::Value>,
}

/// Submission acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAck {
    /// Server-assigned task id.
    pub task_id: String,
    /// Initial status, normally `queued` or `running`.
    pub status: TaskStatus,
}

/// Candle resolution for chart data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OhlcResolution {
    /// Strategy timeframe candles (`/ohlc`).
    M15,
    /// One-minute candles for playback (`/ohlc-m1`).
    M1,
}

impl OhlcResolution {
    /// Path segment under `/backtest/{id}/`.
    #[must_use]
    pub const fn path_segment(&self) -> &'static str {
        match self {
            Self::M15 => "ohlc",
            Self::M1 => "ohlc-m1",
        }
    }
}

/// One OHLC bar with optional indicator overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time.
    #[serde(default, deserialize_with = "crate::domain::time::deserialize_lenient")]
    pub timestamp: Option<NaiveDateTime>,
    /// Open.
    pub open: Decimal,
    /// High.
    pub high: Decimal,
    /// Low.
    pub low: Decimal,
    /// Close.
    pub close: Decimal,
    /// Fast EMA.
    #[serde(default)]
    pub ema_fast: Option<Decimal>,
    /// Mid EMA.
    #[serde(default)]
    pub ema_mid: Option<Decimal>,
    /// Slow EMA.
    #[serde(default)]
    pub ema_slow: Option<Decimal>,
    /// RSI.
    #[serde(default)]
    pub rsi: Option<Decimal>,
    /// ADX.
    #[serde(default)]
    pub adx: Option<Decimal>,
}

/// Trade marker on a chart, with its price levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTrade {
    /// Ticket number.
    #[serde(default)]
    pub ticket_number: i64,
    /// Symbol.
    #[serde(default)]
    pub symbol: String,
    /// Direction.
    #[serde(default)]
    pub side: String,
    /// Strategy.
    #[serde(default)]
    pub strategy: String,
    /// Entry time.
    #[serde(default, deserialize_with = "crate::domain::time::deserialize_lenient")]
    pub entry_time: Option<NaiveDateTime>,
    /// Exit time.
    #[serde(default, deserialize_with = "crate::domain::time::deserialize_lenient")]
    pub exit_time: Option<NaiveDateTime>,
    /// Entry price.
    #[serde(default)]
    pub entry_price: Decimal,
    /// Exit price.
    #[serde(default)]
    pub exit_price: Option<Decimal>,
    /// Stop-loss level.
    #[serde(default)]
    pub stop_loss: Option<Decimal>,
    /// Take-profit level.
    #[serde(default)]
    pub take_profit: Option<Decimal>,
    /// Outcome in R.
    #[serde(default)]
    pub r_multiple: Option<Decimal>,
    /// Realized profit.
    #[serde(default)]
    pub profit_loss: Option<Decimal>,
    /// Exit reason.
    #[serde(default)]
    pub exit_reason: Option<String>,
    /// Whether the trade won.
    #[serde(default)]
    pub is_win: bool,
}

/// Chart data for one backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcSeries {
    /// Symbol.
    pub symbol: String,
    /// First day.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Candle timeframe.
    #[serde(default)]
    pub timeframe: String,
    /// Bars in time order.
    #[serde(default)]
    pub candles: Vec<Candle>,
    /// Trade markers.
    #[serde(default)]
    pub trades: Vec<ChartTrade>,
    /// Pip size of the symbol.
    #[serde(default)]
    pub pip_size: Decimal,
    /// Display precision.
    #[serde(default)]
    pub decimal_places: u32,
}

/// Backtest service port error (transport family).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BacktestServiceError {
    /// Service unreachable or the request timed out.
    #[error("Backtest service connection error: {message}")]
    Connection {
        /// Error details.
        message: String,
    },

    /// Service answered with a non-success status.
    #[error("Backtest service returned HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// Task or resource does not exist.
    #[error("Backtest resource not found: {resource}")]
    NotFound {
        /// What was requested.
        resource: String,
    },

    /// Response body did not match the expected schema.
    #[error("Failed to decode backtest service response: {message}")]
    Decode {
        /// Error details.
        message: String,
    },

    /// Retries on a transient failure were exhausted.
    #[error("Backtest service request failed after {attempts} attempts: {message}")]
    RetriesExhausted {
        /// Attempts made.
        attempts: u32,
        /// Last failure.
        message: String,
    },
}

/// Port for the remote backtest service.
#[async_trait]
pub trait BacktestService: Send + Sync {
    /// Liveness probe.
    async fn health(&self) -> Result<HealthStatus, BacktestServiceError>;

    /// Capabilities and data coverage.
    async fn info(&self) -> Result<ServiceInfo, BacktestServiceError>;

    /// Submit a backtest. Never retried by implementations.
    async fn submit(&self, submission: &BacktestSubmission) -> Result<SubmitAck, BacktestServiceError>;

    /// Current state of a task.
    async fn status(&self, task_id: &str) -> Result<BacktestTask, BacktestServiceError>;

    /// Raw result payload of a completed task.
    async fn results(&self, kind: JobKind, task_id: &str) -> Result<serde_json::Value, BacktestServiceError>;

    /// Chart data of a completed task.
    async fn ohlc(&self, task_id: &str, resolution: OhlcResolution) -> Result<OhlcSeries, BacktestServiceError>;
}

impl fmt::Display for OhlcResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::M15 => f.write_str("M15"),
            Self::M1 => f.write_str("M1"),
        }
    }
}
