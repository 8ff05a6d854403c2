//! Equity curve replay.

use rust_decimal::Decimal;

use crate::domain::{EquityPoint, TradeRecord};

/// One point per trade, replayed by exit time ascending. Running totals
/// saturate at the decimal range.
#[must_use]
pub fn build_equity_curve(trades: &[TradeRecord], initial_balance: Decimal) -> Vec<EquityPoint> {
    let mut ordered: Vec<&TradeRecord> = trades.iter().collect();
    ordered.sort_by_key(|t| t.exit_time);

    let mut balance = initial_balance;
    let mut cumulative_r = Decimal::ZERO;

    ordered
        .into_iter()
        .map(|trade| {
            let r = trade.r_multiple();
            balance = balance.saturating_add(trade.profit);
            cumulative_r = cumulative_r.saturating_add(r);
            EquityPoint {
                timestamp: Some(trade.exit_time),
                balance,
                r_multiple: r,
                cumulative_r,
                strategy: Some(trade.strategy.clone()),
            }
        })
        .collect()
}
