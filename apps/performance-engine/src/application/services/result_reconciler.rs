//! Result Reconciler
//!
//! Normalizes single-pair and multi-pair result payloads into one
//! [`BacktestReport`]. The payload shape is decided by an explicit decode
//! attempt per schema, multi-pair first.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::analytics::StreakCalculator;
use crate::application::dto::{BacktestReport, BacktestSummary, BreakdownStats, normalize_key};
use crate::domain::{BacktestTrade, EquityPoint, JobKind};

/// Per-strategy section of a single-pair result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StrategySection {
    /// Trades.
    #[serde(default)]
    pub trades: u64,
    /// Wins.
    #[serde(default)]
    pub wins: u64,
    /// Losses.
    #[serde(default)]
    pub losses: u64,
    /// Sum of R.
    #[serde(default)]
    pub total_r: Decimal,
    /// Sum of profit.
    #[serde(default)]
    pub total_pl: Decimal,
    /// Win percentage.
    #[serde(default)]
    pub win_rate: Decimal,
    /// Mean R.
    #[serde(default)]
    pub avg_r: Decimal,
}

/// `GET /backtest/{id}/results` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SinglePairResult {
    /// Task id.
    #[serde(default)]
    pub task_id: String,
    /// Symbol.
    #[serde(default)]
    pub symbol: String,
    /// Starting balance.
    pub initial_balance: Decimal,
    /// Ending balance.
    pub final_balance: Decimal,
    /// Net profit.
    #[serde(default)]
    pub net_profit: Decimal,
    /// Return percentage.
    #[serde(default)]
    pub return_pct: Decimal,
    /// Closed trades.
    pub total_trades: u64,
    /// Winning trades.
    #[serde(default)]
    pub winning_trades: u64,
    /// Losing trades.
    #[serde(default)]
    pub losing_trades: u64,
    /// Win percentage.
    #[serde(default)]
    pub win_rate: Decimal,
    /// Sum of R.
    #[serde(default)]
    pub total_r: Decimal,
    /// Mean R.
    #[serde(default)]
    pub avg_r: Decimal,
    /// Drawdown percentage.
    #[serde(default)]
    pub max_drawdown_pct: Decimal,
    /// Drawdown in currency.
    #[serde(default)]
    pub max_drawdown_dollars: Decimal,
    /// Profit factor; null when undefined.
    #[serde(default)]
    pub profit_factor: Option<Decimal>,
    /// Sharpe-like ratio.
    #[serde(default)]
    pub sharpe_ratio: Decimal,
    /// Longest winning run.
    #[serde(default)]
    pub max_consecutive_wins: u64,
    /// Longest losing run.
    #[serde(default)]
    pub max_consecutive_losses: u64,
    /// Trend-following section.
    #[serde(default)]
    pub trend_rider: Option<StrategySection>,
    /// Range section.
    #[serde(default)]
    pub range_rider: Option<StrategySection>,
    /// Trades.
    #[serde(default)]
    pub trades: Vec<BacktestTrade>,
    /// Equity curve.
    #[serde(default)]
    pub equity_curve: Vec<EquityPoint>,
}

/// Top-level statistics of a multi-pair result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MultiPairStatistics {
    /// Closed trades.
    pub total_trades: u64,
    /// Winning trades.
    #[serde(default)]
    pub wins: u64,
    /// Losing trades.
    #[serde(default)]
    pub losses: u64,
    /// Win percentage.
    #[serde(default)]
    pub win_rate: Decimal,
    /// Sum of R.
    #[serde(default)]
    pub total_r: Decimal,
    /// Mean R.
    #[serde(default)]
    pub avg_r: Decimal,
    /// Drawdown percentage.
    #[serde(default)]
    pub max_drawdown: Decimal,
    /// Sharpe-like ratio.
    #[serde(default)]
    pub sharpe_ratio: Decimal,
    /// Starting balance.
    #[serde(default)]
    pub initial_balance: Decimal,
    /// Ending balance.
    #[serde(default)]
    pub final_balance: Decimal,
    /// Net profit.
    #[serde(default)]
    pub net_profit: Decimal,
    /// Return percentage.
    #[serde(default)]
    pub return_percent: Decimal,
}

/// Per-pair or per-strategy slice of a multi-pair result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SliceStatistics {
    /// Trades.
    #[serde(default)]
    pub trades: u64,
    /// Win percentage.
    #[serde(default)]
    pub win_rate: Decimal,
    /// Sum of R.
    #[serde(default)]
    pub total_r: Decimal,
}

/// `GET /backtest/multi-pair/{id}/results` payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MultiPairResult {
    /// Aggregate statistics.
    pub statistics: MultiPairStatistics,
    /// Trades.
    #[serde(default)]
    pub trades: Vec<BacktestTrade>,
    /// Equity curve.
    #[serde(default)]
    pub equity_curve: Vec<EquityPoint>,
    /// Slices per pair.
    #[serde(default)]
    pub pair_breakdown: BTreeMap<String, SliceStatistics>,
    /// Slices per strategy, keys in whatever casing the service uses.
    #[serde(default)]
    pub strategy_breakdown: BTreeMap<String, SliceStatistics>,
}

/// A decoded result payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    /// Single-pair shape.
    SinglePair(Box<SinglePairResult>),
    /// Multi-pair shape.
    MultiPair(Box<MultiPairResult>),
    /// Matches neither schema.
    Unrecognized(serde_json::Value),
}

impl ResultPayload {
    /// Decode `value`, trying the multi-pair schema first.
    #[must_use]
    pub fn parse(value: serde_json::Value) -> Self {
        if let Ok(multi) = MultiPairResult::deserialize(&value) {
            return Self::MultiPair(Box::new(multi));
        }
        match SinglePairResult::deserialize(&value) {
            Ok(single) => Self::SinglePair(Box::new(single)),
            Err(e) => {
                tracing::warn!(error = %e, "Backtest result matches no known schema");
                Self::Unrecognized(value)
            }
        }
    }
}

/// Maps result payloads onto [`BacktestReport`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultReconciler;

impl ResultReconciler {
    /// Build the common view; `None` for unrecognized payloads.
    #[must_use]
    pub fn reconcile(payload: ResultPayload) -> Option<BacktestReport> {
        match payload {
            ResultPayload::SinglePair(result) => Some(Self::from_single(*result)),
            ResultPayload::MultiPair(result) => Some(Self::from_multi(*result)),
            ResultPayload::Unrecognized(_) => None,
        }
    }

    fn from_single(result: SinglePairResult) -> BacktestReport {
        let summary = BacktestSummary {
            initial_balance: result.initial_balance,
            final_balance: result.final_balance,
            net_profit: result.net_profit,
            return_pct: result.return_pct,
            total_trades: result.total_trades,
            winning_trades: result.winning_trades,
            losing_trades: result.losing_trades,
            win_rate: result.win_rate,
            total_r: result.total_r,
            avg_r: result.avg_r,
            max_drawdown_pct: result.max_drawdown_pct,
            max_drawdown: result.max_drawdown_dollars,
            profit_factor: result.profit_factor.unwrap_or_default(),
            sharpe_ratio: result.sharpe_ratio,
            max_consecutive_wins: result.max_consecutive_wins,
            max_consecutive_losses: result.max_consecutive_losses,
        };

        let by_strategy = [("trend_rider", result.trend_rider), ("range_rider", result.range_rider)]
            .into_iter()
            .filter_map(|(name, section)| section.map(|s| (name.to_string(), section_stats(s))))
            .collect();

        BacktestReport {
            kind: JobKind::SinglePair,
            by_symbol: breakdown_from_trades(&result.trades, |t| t.symbol.as_str()),
            by_strategy,
            trades: result.trades,
            equity_curve: result.equity_curve,
            summary,
        }
    }

    fn from_multi(result: MultiPairResult) -> BacktestReport {
        let stats = &result.statistics;
        let streaks = StreakCalculator::max_streaks(&result.trades);

        let summary = BacktestSummary {
            initial_balance: stats.initial_balance,
            final_balance: stats.final_balance,
            net_profit: stats.net_profit,
            return_pct: stats.return_percent,
            total_trades: stats.total_trades,
            winning_trades: stats.wins,
            losing_trades: stats.losses,
            win_rate: stats.win_rate,
            total_r: stats.total_r,
            avg_r: stats.avg_r,
            max_drawdown_pct: stats.max_drawdown,
            max_drawdown: stats
                .initial_balance
                .checked_mul(stats.max_drawdown)
                .map_or(Decimal::ZERO, |scaled| scaled / Decimal::ONE_HUNDRED),
            profit_factor: profit_factor_by_r(&result.trades),
            sharpe_ratio: stats.sharpe_ratio,
            max_consecutive_wins: streaks.max_consecutive_wins,
            max_consecutive_losses: streaks.max_consecutive_losses,
        };

        BacktestReport {
            kind: JobKind::MultiPair,
            summary,
            by_strategy: normalize_slices(result.strategy_breakdown),
            by_symbol: normalize_slices(result.pair_breakdown),
            trades: result.trades,
            equity_curve: result.equity_curve,
        }
    }
}

/// Profit of positive-R trades over the absolute profit of negative-R trades.
fn profit_factor_by_r(trades: &[BacktestTrade]) -> Decimal {
    let mut won = Decimal::ZERO;
    let mut lost = Decimal::ZERO;
    for trade in trades {
        let r = trade.r_multiple.unwrap_or_default();
        let pl = trade.profit_loss.unwrap_or_default();
        if r > Decimal::ZERO {
            won = won.saturating_add(pl);
        } else if r < Decimal::ZERO {
            lost = lost.saturating_add(pl);
        }
    }
    let lost = lost.abs();
    if lost > Decimal::ZERO {
        won.checked_div(lost).unwrap_or_default()
    } else {
        Decimal::ZERO
    }
}

fn section_stats(section: StrategySection) -> BreakdownStats {
    BreakdownStats {
        trades: section.trades,
        wins: Some(section.wins),
        losses: Some(section.losses),
        win_rate: section.win_rate,
        total_r: section.total_r,
        avg_r: Some(section.avg_r),
        total_pl: Some(section.total_pl),
    }
}

/// Re-key slices case-insensitively. Slices whose keys differ only by case
/// are merged: trade counts and total R add up, win rate is trade-weighted.
fn normalize_slices(slices: BTreeMap<String, SliceStatistics>) -> BTreeMap<String, BreakdownStats> {
    let mut normalized: BTreeMap<String, BreakdownStats> = BTreeMap::new();
    for (key, slice) in slices {
        match normalized.entry(normalize_key(&key)) {
            Entry::Vacant(vacant) => {
                vacant.insert(BreakdownStats {
                    trades: slice.trades,
                    win_rate: slice.win_rate,
                    total_r: slice.total_r,
                    ..BreakdownStats::default()
                });
            }
            Entry::Occupied(mut occupied) => {
                tracing::warn!(
                    key = %key,
                    merged_into = %occupied.key(),
                    "Breakdown keys differ only by case, merging"
                );
                merge_slice(occupied.get_mut(), &slice);
            }
        }
    }
    normalized
}

fn merge_slice(into: &mut BreakdownStats, slice: &SliceStatistics) {
    let trades = into.trades.saturating_add(slice.trades);
    if trades > 0 {
        let weighted = into
            .win_rate
            .checked_mul(Decimal::from(into.trades))
            .zip(slice.win_rate.checked_mul(Decimal::from(slice.trades)))
            .and_then(|(a, b)| a.checked_add(b))
            .and_then(|sum| sum.checked_div(Decimal::from(trades)));
        into.win_rate = weighted.unwrap_or(into.win_rate);
    }
    into.trades = trades;
    into.total_r = into.total_r.saturating_add(slice.total_r);
}

fn breakdown_from_trades<'a>(
    trades: &'a [BacktestTrade],
    key_fn: impl Fn(&'a BacktestTrade) -> &'a str,
) -> BTreeMap<String, BreakdownStats> {
    let mut groups: BTreeMap<String, Vec<&BacktestTrade>> = BTreeMap::new();
    for trade in trades {
        groups.entry(normalize_key(key_fn(trade))).or_default().push(trade);
    }

    groups
        .into_iter()
        .map(|(key, group)| {
            let count = group.len() as u64;
            let wins = group
                .iter()
                .filter(|t| t.r_multiple.unwrap_or_default() > Decimal::ZERO)
                .count() as u64;
            let total_r = group
                .iter()
                .map(|t| t.r_multiple.unwrap_or_default())
                .fold(Decimal::ZERO, Decimal::saturating_add);
            let total_pl = group
                .iter()
                .map(|t| t.profit_loss.unwrap_or_default())
                .fold(Decimal::ZERO, Decimal::saturating_add);
            let count_dec = Decimal::from(count);
            (
                key,
                BreakdownStats {
                    trades: count,
                    wins: Some(wins),
                    losses: Some(count - wins),
                    win_rate: Decimal::from(wins) / count_dec * Decimal::ONE_HUNDRED,
                    total_r,
                    avg_r: Some(total_r / count_dec),
                    total_pl: Some(total_pl),
                },
            )
        })
        .collect()
}
