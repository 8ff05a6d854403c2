//! Backtest Service HTTP Adapter
//!
//! `BacktestService` over the backtest compute service's REST API:
//! - GET requests retried with exponential backoff and jitter
//! - POST submissions sent exactly once
//! - Wire types converted to domain types at the boundary

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::HttpBacktestService;
pub use config::{BacktestApiConfig, DEFAULT_BASE_URL, RetryConfig};
pub use error::BacktestApiError;
