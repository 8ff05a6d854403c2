//! Aggregate statistics snapshots.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::trade::TradeRecord;

/// Aggregate statistics over a trade collection.
///
/// Always recomputed from a collection, never updated in place. The empty
/// collection maps to [`TradeStatistics::default`], where every count and ratio
/// is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeStatistics {
    /// Number of trades.
    pub total_trades: u64,
    /// Trades with profit > 0.
    pub wins: u64,
    /// Trades with profit <= 0.
    pub losses: u64,
    /// Wins as a percentage of total trades (0-100).
    pub win_rate: Decimal,
    /// Sum of profit.
    pub total_profit: Decimal,
    /// Mean R-multiple.
    pub average_r_multiple: Decimal,
    /// Gross profit / gross loss, 0 when there are no losses.
    pub profit_factor: Decimal,
    /// Largest peak-to-trough decline of cumulative profit, in currency units.
    pub max_drawdown: Decimal,
    /// Mean profit over population standard deviation of profit.
    pub sharpe_ratio: Decimal,
    /// Sum of positive profits.
    pub gross_profit: Decimal,
    /// Absolute sum of negative profits.
    pub gross_loss: Decimal,
    /// Trade with the highest R-multiple.
    pub best_trade: Option<TradeRecord>,
    /// Trade with the lowest R-multiple.
    pub worst_trade: Option<TradeRecord>,
}

impl TradeStatistics {
    /// Whether the snapshot was computed from an empty collection.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_trades == 0
    }
}

/// Maximum consecutive win and loss runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    /// Longest run of winning trades.
    pub max_consecutive_wins: u64,
    /// Longest run of losing trades.
    pub max_consecutive_losses: u64,
}

/// One point on the equity curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// Instant the balance was reached.
    #[serde(default, deserialize_with = "super::time::deserialize_lenient")]
    pub timestamp: Option<NaiveDateTime>,
    /// Running account balance.
    pub balance: Decimal,
    /// R-multiple of the trade that produced this point.
    #[serde(default)]
    pub r_multiple: Decimal,
    /// Cumulative R up to and including this point.
    #[serde(default)]
    pub cumulative_r: Decimal,
    /// Strategy of the trade that produced this point.
    #[serde(default)]
    pub strategy: Option<String>,
}
