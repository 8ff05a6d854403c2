//! Trade History File Adapter
//!
//! `TradeStore` backed by the JSON file the trading terminal exports, with
//! modification-time polling for change detection.

mod error;
mod file_store;
mod wire;

pub use error::DataError;
pub use file_store::{JsonTradeFileStore, ReloadOutcome, parse_history};
pub use wire::{RawTradeRecord, TradeHistoryFile};
