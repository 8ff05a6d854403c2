//! CSV trade history export.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use super::filter::TradeFilter;
use crate::analytics::format_fixed;
use crate::domain::{BrokerClock, TradeRecord};

/// Column header of the export.
pub const CSV_HEADER: [&str; 11] = [
    "Ticket",
    "Symbol",
    "Strategy",
    "Type",
    "Lots",
    "Entry Price",
    "Exit Price",
    "Entry Time",
    "Exit Time",
    "Profit",
    "R-Multiple",
];

const PRICE_PLACES: u32 = 5;
const AMOUNT_PLACES: u32 = 2;

/// Export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Destination could not be opened or written.
    #[error("export I/O error: {0}")]
    Io(#[from] io::Error),

    /// Record encoding failed.
    #[error("CSV encoding error: {0}")]
    Csv(#[from] csv::Error),
}

/// Serializes trade collections to CSV.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter {
    clock: BrokerClock,
}

impl CsvExporter {
    /// Exporter rendering times with `clock`.
    #[must_use]
    pub const fn new(clock: BrokerClock) -> Self {
        Self { clock }
    }

    /// Export to an in-memory buffer.
    ///
    /// Filtering happens first; rows are ordered by entry time ascending. An
    /// empty selection yields a header-only document.
    pub fn export(&self, trades: &[TradeRecord], filter: &TradeFilter) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Vec::new();
        self.export_to_writer(trades, filter, &mut buffer)?;
        Ok(buffer)
    }

    /// Export to any writer. Returns the number of data rows written.
    pub fn export_to_writer<W: Write>(
        &self,
        trades: &[TradeRecord],
        filter: &TradeFilter,
        writer: W,
    ) -> Result<usize, ExportError> {
        let mut selected: Vec<&TradeRecord> = trades
            .iter()
            .filter(|t| filter.matches(t, &self.clock))
            .collect();
        selected.sort_by_key(|t| t.entry_time);

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(CSV_HEADER)?;
        for trade in &selected {
            csv_writer.write_record(self.row(trade))?;
        }
        csv_writer.flush()?;

        debug!(rows = selected.len(), total = trades.len(), "Trades serialized to CSV");
        Ok(selected.len())
    }

    /// Export to a file, creating or truncating it.
    pub fn export_to_path(
        &self,
        trades: &[TradeRecord],
        filter: &TradeFilter,
        path: &Path,
    ) -> Result<usize, ExportError> {
        let file = File::create(path)?;
        let rows = self.export_to_writer(trades, filter, io::BufWriter::new(file))?;
        info!(path = %path.display(), rows, "Trade history exported");
        Ok(rows)
    }

    fn row(&self, trade: &TradeRecord) -> [String; 11] {
        [
            trade.ticket.to_string(),
            trade.symbol.clone(),
            trade.strategy.clone(),
            trade.side.to_string(),
            format_fixed(trade.lots, AMOUNT_PLACES),
            format_fixed(trade.entry_price, PRICE_PLACES),
            format_fixed(trade.exit_price, PRICE_PLACES),
            self.clock.display(trade.entry_time),
            self.clock.display(trade.exit_time),
            format_fixed(trade.profit, AMOUNT_PLACES),
            format_fixed(trade.r_multiple(), AMOUNT_PLACES),
        ]
    }
}
