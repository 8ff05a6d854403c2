//! Domain Layer
//!
//! Value types shared by every other layer. Nothing here performs I/O.
//!
//! - [`trade`]: Closed trade records and the derived R-multiple
//! - [`statistics`]: Aggregate statistics, streaks, equity points
//! - [`backtest`]: Backtest requests, task lifecycle, result trades
//! - [`time`]: Broker-clock timestamp parsing and local conversion

pub mod backtest;
pub mod statistics;
pub mod time;
pub mod trade;

pub use backtest::{
    BacktestRequest, BacktestSelection, BacktestSubmission, BacktestTask, BacktestTrade, JobKind,
    MultiPairBacktestRequest, MultiPairConfig, RequestValidationError, TaskStatus,
};
pub use statistics::{EquityPoint, Streaks, TradeStatistics};
pub use time::{BrokerClock, parse_timestamp};
pub use trade::{ClosedTrade, RISK_FRACTION, Side, TradeRecord};
