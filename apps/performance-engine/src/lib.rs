// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Performance Engine - Rust Core Library
//!
//! Trade performance analytics and backtest job orchestration for the forex
//! trading desk.
//!
//! # Architecture (Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Value types with no I/O
//!   - `trade`: Closed trades, sides, R-multiple
//!   - `statistics`: Aggregate statistics, streaks, equity points
//!   - `backtest`: Requests, task lifecycle, result trades
//!   - `time`: Broker-clock timestamps
//!
//! - **Analytics**: Pure computations over trade collections
//!   - `StatisticsEngine`, `StreakCalculator`, `GroupAggregator`, equity curve
//!
//! - **Export**: Filtered CSV export of the trade history
//!
//! - **Application**: Ports and orchestration
//!   - `ports`: `TradeStore`, `BacktestService`
//!   - `services`: `BacktestJobClient`, `ResultReconciler`, `PerformanceMonitor`
//!   - `dto`: `PerformanceReport`, `BacktestReport`
//!
//! - **Infrastructure**: Adapters
//!   - `trade_store`: JSON trade history file with change polling
//!   - `backtest_api`: HTTP backtest service client with retry
//!
//! - **Config** / **Observability**: YAML configuration, tracing, Prometheus

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Layers
// =============================================================================

/// Domain layer - Value types with no external dependencies.
pub mod domain;

/// Analytics - Statistics, streaks, grouping, equity curve.
pub mod analytics;

/// Export - CSV trade history export.
pub mod export;

/// Application layer - Ports, services, and DTOs.
pub mod application;

/// Infrastructure layer - Adapters for the trade file and backtest service.
pub mod infrastructure;

/// Configuration loading and validation.
pub mod config;

/// Logging and metrics.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::{
    BacktestRequest, BacktestSelection, BacktestSubmission, BacktestTask, BacktestTrade,
    BrokerClock, EquityPoint, JobKind, MultiPairBacktestRequest, Side, Streaks, TaskStatus,
    TradeRecord, TradeStatistics,
};

// Analytics re-exports
pub use analytics::{GroupAggregator, StatisticsEngine, StreakCalculator, build_equity_curve};

// Export re-exports
pub use export::{CsvExporter, ExportError, TradeFilter};

// Application re-exports
pub use application::dto::{BacktestReport, BacktestSummary, PerformanceReport};
pub use application::ports::{
    BacktestService, BacktestServiceError, TradeSnapshot, TradeStore,
};
pub use application::services::{
    BacktestJobClient, BacktestJobError, PerformanceMonitor, PollSettings, ProgressUpdate,
    ResultPayload, ResultReconciler,
};

// Infrastructure re-exports
pub use infrastructure::backtest_api::{BacktestApiConfig, BacktestApiError, HttpBacktestService};
pub use infrastructure::trade_store::{DataError, JsonTradeFileStore};

// Config re-exports
pub use config::{Config, ConfigError, load_config};
