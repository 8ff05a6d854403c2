//! Trade performance analytics.
//!
//! Pure, synchronous computations over trade collections:
//! - Aggregate statistics (win rate, profit factor, drawdown, Sharpe-like ratio)
//! - Per-strategy and per-symbol breakdowns
//! - Maximum consecutive win/loss streaks
//! - Equity curve replay

mod constants;
mod equity_curve;
mod format;
mod grouping;
mod math;
mod statistics;
mod streaks;

pub use equity_curve::build_equity_curve;
pub use format::{format_fixed, format_pct, format_profit, format_r, format_ratio, round_display};
pub use grouping::GroupAggregator;
pub use statistics::StatisticsEngine;
pub use streaks::StreakCalculator;
