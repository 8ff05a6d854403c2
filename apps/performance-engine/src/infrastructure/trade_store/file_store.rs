//! JSON-file-backed trade store.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::error::DataError;
use super::wire::TradeHistoryFile;
use crate::application::ports::{TradeSnapshot, TradeStore};
use crate::config::TradeStoreConfig;
use crate::domain::TradeRecord;
use crate::observability::metrics::{record_trade_store_failure, record_trades_loaded};

/// Result of one reload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The trade list was replaced and a new snapshot published.
    Replaced {
        /// Trades in the new snapshot.
        trades: usize,
    },
    /// File not modified, or its content matched the current list.
    Unchanged,
    /// File could not be read; the previous snapshot is kept.
    Failed,
}

#[derive(Debug, Default)]
struct LoadState {
    last_modified: Option<SystemTime>,
    snapshot: TradeSnapshot,
}

/// Trade store reading the terminal's `trade_history.json`.
///
/// Holds the canonical list behind a lock and hands out `Arc`-shared
/// snapshots. Every replacement bumps the revision and is pushed to
/// subscribers.
#[derive(Debug)]
pub struct JsonTradeFileStore {
    path: PathBuf,
    state: RwLock<LoadState>,
    tx: watch::Sender<TradeSnapshot>,
}

impl JsonTradeFileStore {
    /// Create a store for `path` without loading it.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (tx, _rx) = watch::channel(TradeSnapshot::default());
        Self {
            path: path.into(),
            state: RwLock::new(LoadState::default()),
            tx,
        }
    }

    /// Create a store for the configured file and load it once.
    #[must_use]
    pub fn open(config: &TradeStoreConfig) -> Self {
        let store = Self::new(config.path());
        store.reload();
        store
    }

    /// History file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file if it changed since the last successful load.
    pub fn reload(&self) -> ReloadOutcome {
        let metadata = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Trade history file not found, treating as zero trades"
                );
                return self.replace(Vec::new(), None);
            }
            Err(source) => {
                return self.fail(&DataError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let modified = metadata.modified().ok();
        {
            let state = self.state.read();
            if let (Some(current), Some(previous)) = (modified, state.last_modified)
                && current <= previous
                && !state.snapshot.is_empty()
            {
                tracing::trace!(path = %self.path.display(), "Trade history unchanged");
                return ReloadOutcome::Unchanged;
            }
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(source) => {
                return self.fail(&DataError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match parse_history(&content) {
            Ok(trades) => self.replace(trades, modified),
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Malformed trade history, treating as zero trades"
                );
                record_trade_store_failure(e.reason());
                self.replace(Vec::new(), None)
            }
        }
    }

    /// Poll the file's modification time every `interval` until `cancel`
    /// fires, reloading on change.
    pub fn spawn_watcher(
        self: &Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let store = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            tracing::info!(
                path = %store.path.display(),
                interval_ms = interval.as_millis(),
                "Trade history watcher started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let ReloadOutcome::Replaced { trades } = store.reload() {
                            tracing::debug!(trades, "Trade history change detected");
                        }
                    }
                    () = cancel.cancelled() => {
                        tracing::info!("Trade history watcher shutting down");
                        break;
                    }
                }
            }
        })
    }

    fn replace(&self, trades: Vec<TradeRecord>, modified: Option<SystemTime>) -> ReloadOutcome {
        let mut state = self.state.write();
        state.last_modified = modified;

        if *state.snapshot.trades == trades {
            return ReloadOutcome::Unchanged;
        }

        let count = trades.len();
        state.snapshot = TradeSnapshot::new(state.snapshot.revision + 1, trades);
        self.tx.send_replace(state.snapshot.clone());
        drop(state);

        record_trades_loaded(count);
        tracing::info!(
            path = %self.path.display(),
            trades = count,
            "Trade history loaded"
        );

        ReloadOutcome::Replaced { trades: count }
    }

    fn fail(&self, error: &DataError) -> ReloadOutcome {
        tracing::warn!(
            path = %self.path.display(),
            error = %error,
            "Trade history unreadable, keeping previous snapshot"
        );
        record_trade_store_failure(error.reason());
        ReloadOutcome::Failed
    }
}

impl TradeStore for JsonTradeFileStore {
    fn snapshot(&self) -> TradeSnapshot {
        self.state.read().snapshot.clone()
    }

    fn subscribe(&self) -> watch::Receiver<TradeSnapshot> {
        self.tx.subscribe()
    }
}

/// Parse history file content into trade records.
///
/// Blank content and a bare `[]` mean zero trades. Records that fail to
/// convert are skipped.
pub fn parse_history(content: &str) -> Result<Vec<TradeRecord>, DataError> {
    let trimmed = content.trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return Ok(Vec::new());
    }

    let file: TradeHistoryFile = serde_json::from_str(trimmed)?;
    let raw = file.trades.unwrap_or_default();
    if raw.len() as u64 != file.total_trades {
        tracing::debug!(
            listed = raw.len(),
            claimed = file.total_trades,
            "Trade count differs from total_trades"
        );
    }

    let trades = raw
        .into_iter()
        .filter_map(|record| match TradeRecord::try_from(record) {
            Ok(trade) => {
                if !trade.is_consistent() {
                    tracing::debug!(
                        ticket = trade.ticket,
                        profit = %trade.profit,
                        r_multiple = %trade.r_multiple(),
                        "Trade profit disagrees with its price move or timing"
                    );
                }
                Some(trade)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping trade record");
                record_trade_store_failure(e.reason());
                None
            }
        })
        .collect();

    Ok(trades)
}
