//! Application Services
//!
//! - [`BacktestJobClient`]: submit, poll, and fetch one backtest
//! - [`ResultReconciler`]: normalize result payloads
//! - [`PerformanceMonitor`]: keep the live performance report current

mod backtest_job;
mod performance_monitor;
mod result_reconciler;

pub use backtest_job::{
    BacktestJob, BacktestJobClient, BacktestJobError, JobState, PollOutcome, PollSettings,
    ProgressUpdate,
};
pub use performance_monitor::PerformanceMonitor;
pub use result_reconciler::{
    MultiPairResult, MultiPairStatistics, ResultPayload, ResultReconciler, SinglePairResult,
    SliceStatistics, StrategySection,
};
