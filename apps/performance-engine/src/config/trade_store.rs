//! Trade history file configuration.

use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::BrokerClock;

/// Trade history file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeStoreConfig {
    /// Directory holding the history file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// History file name.
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Broker clock offset from local time, in hours.
    #[serde(default = "default_offset_hours")]
    pub broker_utc_offset_hours: i64,
    /// Modification-time polling interval (milliseconds).
    #[serde(default = "default_watch_interval_ms")]
    pub watch_interval_ms: u64,
    /// Balance the live equity curve starts from.
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,
}

impl Default for TradeStoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: default_file_name(),
            broker_utc_offset_hours: default_offset_hours(),
            watch_interval_ms: default_watch_interval_ms(),
            initial_balance: default_initial_balance(),
        }
    }
}

impl TradeStoreConfig {
    /// Full path of the history file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    /// Clock built from the configured offset.
    #[must_use]
    pub fn clock(&self) -> BrokerClock {
        BrokerClock::from_offset_hours(self.broker_utc_offset_hours)
    }

    /// Watcher polling interval.
    #[must_use]
    pub const fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms)
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_name() -> String {
    "trade_history.json".to_string()
}

const fn default_offset_hours() -> i64 {
    BrokerClock::DEFAULT_OFFSET_HOURS
}

const fn default_watch_interval_ms() -> u64 {
    1000
}

const fn default_initial_balance() -> Decimal {
    dec!(10000)
}
