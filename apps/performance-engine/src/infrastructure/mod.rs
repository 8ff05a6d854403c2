//! Infrastructure Layer
//!
//! Adapters implementing the application ports:
//! - [`trade_store`]: JSON trade history file
//! - [`backtest_api`]: backtest compute service over HTTP

pub mod backtest_api;
pub mod trade_store;
