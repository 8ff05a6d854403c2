//! Performance Monitor Service
//!
//! Recomputes the [`PerformanceReport`] whenever the trade store publishes a
//! new snapshot and republishes it on its own watch channel.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::dto::PerformanceReport;
use crate::application::ports::{TradeSnapshot, TradeStore};

/// Keeps a live performance report in sync with a trade store.
pub struct PerformanceMonitor<T: TradeStore + ?Sized> {
    store: Arc<T>,
    initial_balance: Decimal,
    tx: watch::Sender<PerformanceReport>,
}

impl<T: TradeStore + ?Sized + 'static> PerformanceMonitor<T> {
    /// Create a monitor and compute the first report from the current
    /// snapshot.
    #[must_use]
    pub fn new(store: Arc<T>, initial_balance: Decimal) -> Self {
        let initial = PerformanceReport::compute(&store.snapshot(), initial_balance);
        let (tx, _rx) = watch::channel(initial);
        Self {
            store,
            initial_balance,
            tx,
        }
    }

    /// Receive every recomputed report.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PerformanceReport> {
        self.tx.subscribe()
    }

    /// Most recent report.
    #[must_use]
    pub fn latest(&self) -> PerformanceReport {
        self.tx.borrow().clone()
    }

    /// Recompute from the store's current snapshot and publish.
    pub fn refresh(&self) -> PerformanceReport {
        self.publish(&self.store.snapshot())
    }

    /// Recompute on every store change until `cancel` fires or the store
    /// goes away.
    pub fn spawn(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        let mut changes = monitor.store.subscribe();

        tokio::spawn(async move {
            tracing::info!("Performance monitor started");

            loop {
                tokio::select! {
                    changed = changes.changed() => {
                        if changed.is_err() {
                            tracing::info!("Trade store closed, performance monitor stopping");
                            break;
                        }
                        // Own copy: the store may publish again while we compute.
                        let snapshot = changes.borrow_and_update().clone();
                        monitor.publish(&snapshot);
                    }
                    () = cancel.cancelled() => {
                        tracing::info!("Performance monitor shutting down");
                        break;
                    }
                }
            }
        })
    }

    fn publish(&self, snapshot: &TradeSnapshot) -> PerformanceReport {
        let report = PerformanceReport::compute(snapshot, self.initial_balance);

        tracing::info!(
            revision = report.revision,
            trades = report.overall.total_trades,
            win_rate = %report.overall.win_rate.round_dp(2),
            total_profit = %report.overall.total_profit,
            max_drawdown = %report.overall.max_drawdown,
            "Performance report updated"
        );

        self.tx.send_replace(report.clone());
        report
    }
}
