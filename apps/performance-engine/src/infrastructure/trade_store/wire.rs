//! Trade history file format as written by the trading terminal.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::DataError;
use crate::domain::{Side, TradeRecord, parse_timestamp};

/// Top-level document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeHistoryFile {
    /// When the terminal wrote the file.
    #[serde(default)]
    pub exported_at: Option<String>,
    /// Trade count claimed by the writer.
    #[serde(default)]
    pub total_trades: u64,
    /// Closed trades. `null` is treated as empty.
    #[serde(default)]
    pub trades: Option<Vec<RawTradeRecord>>,
}

/// One trade as exported.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTradeRecord {
    /// Broker ticket.
    #[serde(default)]
    pub ticket: i64,
    /// Symbol.
    #[serde(default)]
    pub symbol: String,
    /// Strategy tag.
    #[serde(default)]
    pub strategy: String,
    /// `BUY` or `SELL`.
    #[serde(rename = "type", default)]
    pub trade_type: String,
    /// Entry price.
    #[serde(default)]
    pub open_price: Decimal,
    /// Exit price.
    #[serde(default)]
    pub close_price: Decimal,
    /// Lot size.
    #[serde(default)]
    pub lots: Decimal,
    /// Realized profit.
    #[serde(default)]
    pub profit: Decimal,
    /// Entry time (broker clock).
    #[serde(default)]
    pub open_time: String,
    /// Exit time (broker clock).
    #[serde(default)]
    pub close_time: String,
}

impl TryFrom<RawTradeRecord> for TradeRecord {
    type Error = DataError;

    fn try_from(raw: RawTradeRecord) -> Result<Self, Self::Error> {
        let invalid = |reason: String| DataError::InvalidRecord {
            ticket: raw.ticket,
            reason,
        };

        let side: Side = raw.trade_type.parse().map_err(invalid)?;
        let entry_time = parse_timestamp(&raw.open_time)
            .ok_or_else(|| invalid(format!("unparseable open_time: {:?}", raw.open_time)))?;
        let exit_time = parse_timestamp(&raw.close_time)
            .ok_or_else(|| invalid(format!("unparseable close_time: {:?}", raw.close_time)))?;

        Ok(Self {
            ticket: raw.ticket,
            symbol: raw.symbol,
            strategy: raw.strategy,
            side,
            entry_price: raw.open_price,
            exit_price: raw.close_price,
            lots: raw.lots,
            profit: raw.profit,
            entry_time,
            exit_time,
        })
    }
}
