//! Trade Store Port (Driven Port)
//!
//! Source of the canonical closed-trade list. Consumers only ever see
//! immutable snapshots; changes are pushed through a watch channel.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::watch;

use crate::domain::{BrokerClock, TradeRecord};

/// Immutable view of the trade list at one revision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeSnapshot {
    /// Increases by one every time the list is replaced.
    pub revision: u64,
    /// Trades in file order.
    pub trades: Arc<Vec<TradeRecord>>,
}

impl TradeSnapshot {
    /// Snapshot holding `trades` at `revision`.
    #[must_use]
    pub fn new(revision: u64, trades: Vec<TradeRecord>) -> Self {
        Self {
            revision,
            trades: Arc::new(trades),
        }
    }

    /// Number of trades.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// Whether the snapshot has no trades.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// The `count` most recently closed trades, newest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<TradeRecord> {
        let mut trades: Vec<TradeRecord> = self.trades.to_vec();
        trades.sort_by(|a, b| b.exit_time.cmp(&a.exit_time));
        trades.truncate(count);
        trades
    }

    /// Trades whose local entry time is within `[start, end]`, newest entry first.
    #[must_use]
    pub fn in_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        clock: &BrokerClock,
    ) -> Vec<TradeRecord> {
        self.select_newest_first(|t| {
            let entry = t.local_entry_time(clock);
            entry >= start && entry <= end
        })
    }

    /// Trades for one symbol, newest entry first.
    #[must_use]
    pub fn for_symbol(&self, symbol: &str) -> Vec<TradeRecord> {
        self.select_newest_first(|t| t.symbol == symbol)
    }

    /// Trades for one strategy, newest entry first.
    #[must_use]
    pub fn for_strategy(&self, strategy: &str) -> Vec<TradeRecord> {
        self.select_newest_first(|t| t.strategy == strategy)
    }

    fn select_newest_first(&self, keep: impl Fn(&TradeRecord) -> bool) -> Vec<TradeRecord> {
        let mut trades: Vec<TradeRecord> = self.trades.iter().filter(|t| keep(t)).cloned().collect();
        trades.sort_by(|a, b| b.entry_time.cmp(&a.entry_time));
        trades
    }
}

/// Port for the trade-record source.
pub trait TradeStore: Send + Sync {
    /// Current snapshot.
    fn snapshot(&self) -> TradeSnapshot;

    /// Receiver notified with every new snapshot.
    fn subscribe(&self) -> watch::Receiver<TradeSnapshot>;
}
