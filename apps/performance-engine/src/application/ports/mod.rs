//! Application Ports (Driven)
//!
//! Interfaces to the two external collaborators:
//! - [`TradeStore`]: supplies closed trades as immutable snapshots
//! - [`BacktestService`]: runs backtests remotely

mod backtest_service_port;
mod trade_store_port;

pub use backtest_service_port::{
    BacktestService, BacktestServiceError, Candle, ChartTrade, HealthStatus, OhlcResolution,
    OhlcSeries, ServiceInfo, SubmitAck,
};
pub use trade_store_port::{TradeSnapshot, TradeStore};
