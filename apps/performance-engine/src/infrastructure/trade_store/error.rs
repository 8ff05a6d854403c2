//! Trade history errors.

use std::path::PathBuf;

use thiserror::Error;

/// Malformed or unreadable trade history.
///
/// Never fatal: the store degrades to zero trades (or keeps its last good
/// snapshot) and logs.
#[derive(Debug, Error)]
pub enum DataError {
    /// File could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// History file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File is not a valid history document.
    #[error("malformed trade history: {0}")]
    Malformed(#[from] serde_json::Error),

    /// One record could not be converted.
    #[error("invalid trade record {ticket}: {reason}")]
    InvalidRecord {
        /// Ticket of the offending record.
        ticket: i64,
        /// What was wrong.
        reason: String,
    },
}

impl DataError {
    /// Metric label.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Malformed(_) => "parse",
            Self::InvalidRecord { .. } => "record",
        }
    }
}
