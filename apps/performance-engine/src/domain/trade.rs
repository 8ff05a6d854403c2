//! Closed trade records.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::time::BrokerClock;

/// Assumed risk per trade as a fraction of entry price.
///
/// The trade log carries no stop distance, so risk is approximated as 2% of the
/// entry price. R-multiples computed here are only comparable with other values
/// computed the same way.
pub const RISK_FRACTION: Decimal = dec!(0.02);

/// Position direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Long position.
    Buy,
    /// Short position.
    Sell,
}

impl Side {
    /// Wire representation (`BUY` / `SELL`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" | "LONG" => Ok(Self::Buy),
            "SELL" | "SHORT" => Ok(Self::Sell),
            other => Err(format!("unknown trade side: {other}")),
        }
    }
}

/// One closed position.
///
/// Timestamps are broker-clock instants; use [`BrokerClock`] for local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Broker ticket number.
    pub ticket: i64,
    /// Instrument symbol.
    pub symbol: String,
    /// Strategy tag that opened the position.
    pub strategy: String,
    /// Position direction.
    pub side: Side,
    /// Entry price.
    pub entry_price: Decimal,
    /// Exit price.
    pub exit_price: Decimal,
    /// Lot size.
    pub lots: Decimal,
    /// Realized profit in account currency.
    pub profit: Decimal,
    /// Entry time (broker clock).
    pub entry_time: NaiveDateTime,
    /// Exit time (broker clock).
    pub exit_time: NaiveDateTime,
}

impl TradeRecord {
    /// Profit expressed as a multiple of the assumed risk.
    ///
    /// `|exit - entry| / (entry * RISK_FRACTION)`, positive when the price moved
    /// in the position's favour. Zero when the price did not move, the entry
    /// price is not positive, or the ratio does not fit in a decimal.
    #[must_use]
    pub fn r_multiple(&self) -> Decimal {
        let risk = self.entry_price * RISK_FRACTION;
        if risk <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let Some(r_value) = self
            .exit_price
            .checked_sub(self.entry_price)
            .and_then(|price_move| price_move.abs().checked_div(risk))
        else {
            tracing::warn!(
                ticket = self.ticket,
                entry = %self.entry_price,
                exit = %self.exit_price,
                "R-multiple out of decimal range, reporting 0"
            );
            return Decimal::ZERO;
        };
        if r_value.is_zero() {
            return Decimal::ZERO;
        }

        let favourable = match self.side {
            Side::Buy => self.exit_price > self.entry_price,
            Side::Sell => self.exit_price < self.entry_price,
        };

        if favourable { r_value } else { -r_value }
    }

    /// Whether the trade closed with a positive profit.
    ///
    /// Zero-profit trades are losses for statistics purposes.
    #[must_use]
    pub fn is_winner(&self) -> bool {
        self.profit > Decimal::ZERO
    }

    /// Entry time converted to local time.
    #[must_use]
    pub fn local_entry_time(&self, clock: &BrokerClock) -> NaiveDateTime {
        clock.to_local(self.entry_time)
    }

    /// Exit time converted to local time.
    #[must_use]
    pub fn local_exit_time(&self, clock: &BrokerClock) -> NaiveDateTime {
        clock.to_local(self.exit_time)
    }

    /// Whether the record is internally consistent: it closed no earlier than
    /// it opened, and its profit sign agrees with its R-multiple sign.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let r = self.r_multiple();
        let signs_agree = (self.profit.is_zero() && r.is_zero())
            || (self.profit > Decimal::ZERO && r > Decimal::ZERO)
            || (self.profit < Decimal::ZERO && r < Decimal::ZERO);
        self.exit_time >= self.entry_time && signs_agree
    }
}

/// A trade that can be replayed chronologically by entry time.
///
/// Implemented by live trade records and by backtest trades so both feed the
/// same streak replay.
pub trait ClosedTrade {
    /// Entry instant used for chronological ordering.
    fn opened_at(&self) -> NaiveDateTime;

    /// Outcome in R units.
    fn outcome_r(&self) -> Decimal;
}

impl ClosedTrade for TradeRecord {
    fn opened_at(&self) -> NaiveDateTime {
        self.entry_time
    }

    fn outcome_r(&self) -> Decimal {
        self.r_multiple()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::domain::time::parse_timestamp;

    /// Build a trade with sensible defaults.
    pub fn trade(ticket: i64, side: Side, entry: Decimal, exit: Decimal, profit: Decimal) -> TradeRecord {
        TradeRecord {
            ticket,
            symbol: "EURUSD".to_string(),
            strategy: "TrendRider".to_string(),
            side,
            entry_price: entry,
            exit_price: exit,
            lots: dec!(0.10),
            profit,
            entry_time: parse_timestamp("2024-01-15 10:00").unwrap(),
            exit_time: parse_timestamp("2024-01-15 14:00").unwrap(),
        }
    }

    /// Build a trade opened/closed at the given times.
    pub fn timed(ticket: i64, profit: Decimal, entry: &str, exit: &str) -> TradeRecord {
        let (entry_price, exit_price) = if profit > Decimal::ZERO {
            (dec!(100), dec!(102))
        } else if profit < Decimal::ZERO {
            (dec!(100), dec!(98))
        } else {
            (dec!(100), dec!(100))
        };
        TradeRecord {
            entry_time: parse_timestamp(entry).unwrap(),
            exit_time: parse_timestamp(exit).unwrap(),
            ..trade(ticket, Side::Buy, entry_price, exit_price, profit)
        }
    }
}
