//! Live trade performance report.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::{GroupAggregator, StatisticsEngine, StreakCalculator, build_equity_curve};
use crate::application::ports::TradeSnapshot;
use crate::domain::{EquityPoint, Streaks, TradeRecord, TradeStatistics};

/// Number of trades kept in [`PerformanceReport::recent_trades`].
pub const RECENT_TRADES: usize = 50;

/// Everything the display layer needs about the live trade history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// Snapshot revision the report was computed from.
    pub revision: u64,
    /// Statistics over every trade.
    pub overall: TradeStatistics,
    /// Statistics per strategy tag.
    pub by_strategy: BTreeMap<String, TradeStatistics>,
    /// Statistics per symbol.
    pub by_symbol: BTreeMap<String, TradeStatistics>,
    /// Longest win/loss runs.
    pub streaks: Streaks,
    /// Balance after each trade.
    pub equity_curve: Vec<EquityPoint>,
    /// Most recently closed trades, newest first.
    pub recent_trades: Vec<TradeRecord>,
}

impl PerformanceReport {
    /// Compute a report from one snapshot.
    #[must_use]
    pub fn compute(snapshot: &TradeSnapshot, initial_balance: Decimal) -> Self {
        let trades = snapshot.trades.as_slice();
        Self {
            revision: snapshot.revision,
            overall: StatisticsEngine::compute(trades),
            by_strategy: GroupAggregator::by_strategy(trades),
            by_symbol: GroupAggregator::by_symbol(trades),
            streaks: StreakCalculator::max_streaks(trades),
            equity_curve: build_equity_curve(trades, initial_balance),
            recent_trades: snapshot.recent(RECENT_TRADES),
        }
    }
}
