//! Aggregate statistics over a trade collection.

use rust_decimal::Decimal;

use super::constants::HUNDRED;
use super::math::{checked_sum, mean, population_std_dev};
use crate::domain::{TradeRecord, TradeStatistics};

/// Pure mapping from a trade collection to [`TradeStatistics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsEngine;

impl StatisticsEngine {
    /// Compute aggregate statistics.
    ///
    /// Never fails. An empty input yields [`TradeStatistics::default`]. Caller
    /// order only matters for tie-breaking best/worst trade (first wins); the
    /// drawdown walk re-sorts by exit time. Sums saturate at the decimal
    /// range; ratios that cannot be represented fall back to zero.
    #[must_use]
    pub fn compute(trades: &[TradeRecord]) -> TradeStatistics {
        if trades.is_empty() {
            return TradeStatistics::default();
        }

        let total_trades = trades.len() as u64;
        let wins = trades.iter().filter(|t| t.is_winner()).count() as u64;
        let losses = total_trades - wins;

        let win_rate = Decimal::from(wins) / Decimal::from(total_trades) * HUNDRED;

        let (gross_profit, gross_loss) = gross_totals(trades);
        let profit_factor = if gross_loss > Decimal::ZERO {
            gross_profit.checked_div(gross_loss).unwrap_or_else(|| {
                tracing::warn!(%gross_profit, %gross_loss, "Profit factor out of range, reporting 0");
                Decimal::ZERO
            })
        } else {
            Decimal::ZERO
        };

        let profits: Vec<Decimal> = trades.iter().map(|t| t.profit).collect();
        let total_profit = checked_sum(&profits).unwrap_or_else(|| saturating_total(&profits));

        let r_values: Vec<Decimal> = trades.iter().map(TradeRecord::r_multiple).collect();
        let average_r_multiple = mean(&r_values).unwrap_or_default();

        TradeStatistics {
            total_trades,
            wins,
            losses,
            win_rate,
            total_profit,
            average_r_multiple,
            profit_factor,
            max_drawdown: max_drawdown(trades),
            sharpe_ratio: sharpe_ratio(&profits),
            gross_profit,
            gross_loss,
            best_trade: best_by_r(trades, |candidate, best| candidate > best),
            worst_trade: best_by_r(trades, |candidate, worst| candidate < worst),
        }
    }
}

fn gross_totals(trades: &[TradeRecord]) -> (Decimal, Decimal) {
    trades
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(profit, loss), t| {
            if t.profit > Decimal::ZERO {
                (profit.saturating_add(t.profit), loss)
            } else if t.profit < Decimal::ZERO {
                (profit, loss.saturating_add(t.profit.abs()))
            } else {
                (profit, loss)
            }
        })
}

/// Largest peak-to-trough decline of cumulative profit, replayed by exit time.
fn max_drawdown(trades: &[TradeRecord]) -> Decimal {
    let mut ordered: Vec<&TradeRecord> = trades.iter().collect();
    ordered.sort_by_key(|t| t.exit_time);

    let mut running = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut max_dd = Decimal::ZERO;

    for trade in ordered {
        running = running.saturating_add(trade.profit);
        if running > peak {
            peak = running;
        }
        let drawdown = peak.saturating_sub(running);
        if drawdown > max_dd {
            max_dd = drawdown;
        }
    }

    max_dd
}

/// Sum clamped to the decimal range, used once the exact sum has overflowed.
fn saturating_total(values: &[Decimal]) -> Decimal {
    tracing::warn!(values = values.len(), "Profit total out of decimal range, saturating");
    values
        .iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
}

/// Mean over population standard deviation; zero when there is no
/// dispersion or the moments overflow.
fn sharpe_ratio(profits: &[Decimal]) -> Decimal {
    let (Some(avg), Some(std)) = (mean(profits), population_std_dev(profits)) else {
        if !profits.is_empty() {
            tracing::warn!(trades = profits.len(), "Profit dispersion out of range, reporting Sharpe 0");
        }
        return Decimal::ZERO;
    };
    if std.is_zero() {
        return Decimal::ZERO;
    }
    avg.checked_div(std).unwrap_or_default()
}

/// Select by R-multiple; the first trade wins ties.
fn best_by_r(
    trades: &[TradeRecord],
    replaces: impl Fn(Decimal, Decimal) -> bool,
) -> Option<TradeRecord> {
    let mut selected: Option<(&TradeRecord, Decimal)> = None;
    for trade in trades {
        let r = trade.r_multiple();
        match selected {
            Some((_, current)) if !replaces(r, current) => {}
            _ => selected = Some((trade, r)),
        }
    }
    selected.map(|(trade, _)| trade.clone())
}
