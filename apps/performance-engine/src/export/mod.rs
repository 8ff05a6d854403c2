//! Trade history export.

mod csv_exporter;
mod filter;

pub use csv_exporter::{CSV_HEADER, CsvExporter, ExportError};
pub use filter::TradeFilter;
