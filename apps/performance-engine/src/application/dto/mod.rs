//! Data Transfer Objects (DTOs)
//!
//! Read-only views handed to the display layer.

mod backtest_dto;
mod performance_dto;

pub use backtest_dto::{BacktestReport, BacktestSummary, BreakdownStats, normalize_key};
pub use performance_dto::{PerformanceReport, RECENT_TRADES};
