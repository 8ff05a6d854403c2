//! Per-key statistics partitions.

use std::collections::BTreeMap;

use super::statistics::StatisticsEngine;
use crate::domain::{TradeRecord, TradeStatistics};

/// Partitions trades by a key and computes statistics per partition.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupAggregator;

impl GroupAggregator {
    /// Statistics per distinct key value.
    ///
    /// The key set is exactly the set of keys present in `trades`; a key with
    /// no trades never appears.
    pub fn by_key<F>(trades: &[TradeRecord], key_fn: F) -> BTreeMap<String, TradeStatistics>
    where
        F: Fn(&TradeRecord) -> String,
    {
        let mut partitions: BTreeMap<String, Vec<TradeRecord>> = BTreeMap::new();
        for trade in trades {
            partitions.entry(key_fn(trade)).or_default().push(trade.clone());
        }

        partitions
            .into_iter()
            .map(|(key, group)| (key, StatisticsEngine::compute(&group)))
            .collect()
    }

    /// Statistics per strategy tag.
    #[must_use]
    pub fn by_strategy(trades: &[TradeRecord]) -> BTreeMap<String, TradeStatistics> {
        Self::by_key(trades, |t| t.strategy.clone())
    }

    /// Statistics per symbol.
    #[must_use]
    pub fn by_symbol(trades: &[TradeRecord]) -> BTreeMap<String, TradeStatistics> {
        Self::by_key(trades, |t| t.symbol.clone())
    }
}
