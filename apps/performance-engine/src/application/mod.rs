//! Application Layer
//!
//! Orchestrates the domain and analytics through two driven ports:
//!
//! - **Ports**: Trade store and backtest service interfaces
//! - **Services**: Backtest job client, result reconciler, performance monitor
//! - **DTOs**: Reports handed to the display layer

pub mod dto;
pub mod ports;
pub mod services;

pub use dto::*;
pub use ports::*;
pub use services::*;
