//! Reconciled backtest result view.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{BacktestTrade, EquityPoint, JobKind};

/// Headline figures of a backtest, common to both result shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BacktestSummary {
    /// Starting balance.
    pub initial_balance: Decimal,
    /// Ending balance.
    pub final_balance: Decimal,
    /// Final minus initial balance.
    pub net_profit: Decimal,
    /// Net profit as a percentage of the initial balance.
    pub return_pct: Decimal,
    /// Closed trades.
    pub total_trades: u64,
    /// Winning trades.
    pub winning_trades: u64,
    /// Losing trades.
    pub losing_trades: u64,
    /// Win percentage (0-100).
    pub win_rate: Decimal,
    /// Sum of R.
    pub total_r: Decimal,
    /// Mean R.
    pub avg_r: Decimal,
    /// Maximum drawdown as a percentage.
    pub max_drawdown_pct: Decimal,
    /// Maximum drawdown in account currency.
    pub max_drawdown: Decimal,
    /// Gross profit over gross loss, 0 when there are no losses.
    pub profit_factor: Decimal,
    /// Sharpe-like ratio as reported by the service.
    pub sharpe_ratio: Decimal,
    /// Longest winning run.
    pub max_consecutive_wins: u64,
    /// Longest losing run.
    pub max_consecutive_losses: u64,
}

/// Per-strategy or per-symbol slice of a backtest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BreakdownStats {
    /// Trades in the slice.
    pub trades: u64,
    /// Winning trades, when known.
    pub wins: Option<u64>,
    /// Losing trades, when known.
    pub losses: Option<u64>,
    /// Win percentage (0-100).
    pub win_rate: Decimal,
    /// Sum of R.
    pub total_r: Decimal,
    /// Mean R, when known.
    pub avg_r: Option<Decimal>,
    /// Sum of profit, when known.
    pub total_pl: Option<Decimal>,
}

/// One statistics view over either result shape.
///
/// Breakdown keys are stored lower-case; use [`BacktestReport::strategy`] and
/// [`BacktestReport::symbol`] for case-insensitive lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestReport {
    /// Which result shape this came from.
    pub kind: JobKind,
    /// Trades in the order the service returned them.
    pub trades: Vec<BacktestTrade>,
    /// Balance after each trade.
    pub equity_curve: Vec<EquityPoint>,
    /// Headline figures.
    pub summary: BacktestSummary,
    /// Slices per strategy.
    pub by_strategy: BTreeMap<String, BreakdownStats>,
    /// Slices per symbol.
    pub by_symbol: BTreeMap<String, BreakdownStats>,
}

impl BacktestReport {
    /// Strategy slice, matched case-insensitively.
    #[must_use]
    pub fn strategy(&self, name: &str) -> Option<&BreakdownStats> {
        self.by_strategy.get(&normalize_key(name))
    }

    /// Symbol slice, matched case-insensitively.
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<&BreakdownStats> {
        self.by_symbol.get(&normalize_key(name))
    }
}

/// Canonical breakdown key.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}
