//! Performance Engine Binary
//!
//! Loads the trade history, then exports it, runs a backtest, or watches the
//! history file and keeps the performance report current.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin performance-engine
//! ```
//!
//! # Environment Variables
//!
//! ## Configuration
//! - `PERFORMANCE_ENGINE_CONFIG`: Config file path (default: config.yaml)
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`
//!
//! ## CSV export mode
//! - `EXPORT_CSV`: Output path; enables the mode
//! - `EXPORT_SYMBOL`, `EXPORT_STRATEGY`: Exact match, or `All`
//! - `EXPORT_FROM`, `EXPORT_TO`: `YYYY-MM-DD`, inclusive
//!
//! ## Backtest mode
//! - `BACKTEST_PAIRS`: Comma-separated symbols; enables the mode
//! - `BACKTEST_STRATEGY`: Strategy name or `both` (default: both)
//! - `BACKTEST_FROM`, `BACKTEST_TO`: `YYYY-MM-DD` (default: last 90 days)
//!
//! Without either, the history file is watched until Ctrl+C.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use performance_engine::analytics::{format_pct, format_profit, format_r, format_ratio};
use performance_engine::application::ports::{BacktestService, TradeStore};
use performance_engine::application::services::{
    BacktestJobClient, PerformanceMonitor, ProgressUpdate,
};
use performance_engine::analytics::StatisticsEngine;
use performance_engine::config::{Config, load_config};
use performance_engine::domain::{BacktestSelection, BacktestSubmission, TradeStatistics};
use performance_engine::export::{CsvExporter, TradeFilter};
use performance_engine::infrastructure::backtest_api::HttpBacktestService;
use performance_engine::infrastructure::trade_store::JsonTradeFileStore;
use performance_engine::observability::{MetricsConfig, init_logging, init_metrics};

/// Default backtest window when no dates are given.
const DEFAULT_BACKTEST_DAYS: u64 = 90;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = load_config(None).context("loading configuration")?;
    init_logging(&config.observability.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        history = %config.trade_store.path().display(),
        backtest_service = %config.backtest_service.base_url,
        "Starting performance engine"
    );

    if config.observability.metrics.enabled {
        let addr: SocketAddr = config
            .observability
            .metrics
            .listen_addr
            .parse()
            .context("parsing observability.metrics.listen_addr")?;
        init_metrics(&MetricsConfig::with_addr(addr))?;
    }

    let store = Arc::new(JsonTradeFileStore::open(&config.trade_store));
    let loaded = store.snapshot();
    log_summary("Trade history loaded", &StatisticsEngine::compute(&loaded.trades));

    if let Some(path) = env_nonempty("EXPORT_CSV") {
        return export_csv(&config, &store, Path::new(&path));
    }

    if let Some(pairs) = env_nonempty("BACKTEST_PAIRS") {
        return run_backtest(&config, &pairs).await;
    }

    watch(&config, store).await
}

fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_date(key: &str) -> anyhow::Result<Option<NaiveDate>> {
    env_nonempty(key)
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .with_context(|| format!("{key} must be YYYY-MM-DD, got {raw:?}"))
        })
        .transpose()
}

fn log_summary(label: &str, stats: &TradeStatistics) {
    tracing::info!(
        trades = stats.total_trades,
        win_rate = %format_pct(stats.win_rate),
        profit = %format_profit(stats.total_profit),
        avg_r = %format_r(stats.average_r_multiple),
        profit_factor = %format_ratio(defined(stats.profit_factor)),
        max_drawdown = %format_profit(-stats.max_drawdown),
        "{label}"
    );
}

/// Profit factor is reported as zero when there are no losses.
fn defined(ratio: Decimal) -> Option<Decimal> {
    (!ratio.is_zero()).then_some(ratio)
}

fn export_csv(config: &Config, store: &JsonTradeFileStore, path: &Path) -> anyhow::Result<()> {
    let mut filter =
        TradeFilter::all().with_dates(env_date("EXPORT_FROM")?, env_date("EXPORT_TO")?);
    if let Some(symbol) = env_nonempty("EXPORT_SYMBOL") {
        filter = filter.with_symbol(symbol);
    }
    if let Some(strategy) = env_nonempty("EXPORT_STRATEGY") {
        filter = filter.with_strategy(strategy);
    }

    let snapshot = store.snapshot();
    let rows = CsvExporter::new(config.trade_store.clock())
        .export_to_path(&snapshot.trades, &filter, path)
        .with_context(|| format!("exporting to {}", path.display()))?;

    tracing::info!(rows, path = %path.display(), "Export complete");
    Ok(())
}

async fn run_backtest(config: &Config, pairs: &str) -> anyhow::Result<()> {
    let end_date = match env_date("BACKTEST_TO")? {
        Some(date) => date,
        None => Local::now().date_naive(),
    };
    let start_date = match env_date("BACKTEST_FROM")? {
        Some(date) => date,
        None => end_date
            .checked_sub_days(Days::new(DEFAULT_BACKTEST_DAYS))
            .context("backtest start date out of range")?,
    };

    let selection = BacktestSelection {
        pairs: pairs
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_uppercase)
            .collect(),
        strategy: env_nonempty("BACKTEST_STRATEGY").unwrap_or_else(|| "both".to_string()),
        start_date,
        end_date,
        initial_balance: dec!(10000),
        risk_percent: dec!(2),
        max_positions: 2,
    };
    let submission = BacktestSubmission::from_selection(selection);

    let service = Arc::new(HttpBacktestService::new(
        &config.backtest_service.api_config(),
    )?);
    let health = service
        .health()
        .await
        .context("backtest service health check")?;
    if !health.is_healthy() {
        bail!("backtest service reports status {:?}", health.status);
    }
    tracing::info!(version = %health.version, "Backtest service healthy");

    let client = BacktestJobClient::new(service, config.backtest_service.poll_settings());
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        interrupt.cancel();
    });

    let report = client
        .run(
            &submission,
            |update: ProgressUpdate| {
                tracing::info!(
                    task_id = %update.task_id,
                    status = %update.status,
                    percent = %format!("{:.0}", update.percent),
                    eta_secs = update.eta.map(|d| d.as_secs()),
                    "{}",
                    update.message
                );
            },
            &cancel,
        )
        .await?;

    let summary = &report.summary;
    tracing::info!(
        kind = %report.kind,
        trades = summary.total_trades,
        net_profit = %format_profit(summary.net_profit),
        win_rate = %format_pct(summary.win_rate),
        total_r = %format_r(summary.total_r),
        profit_factor = %format_ratio(defined(summary.profit_factor)),
        max_drawdown_pct = %format_pct(summary.max_drawdown_pct),
        "Backtest finished"
    );
    for (strategy, stats) in &report.by_strategy {
        tracing::info!(
            strategy = %strategy,
            trades = stats.trades,
            win_rate = %format_pct(stats.win_rate),
            total_r = %format_r(stats.total_r),
            "Strategy breakdown"
        );
    }

    Ok(())
}

async fn watch(config: &Config, store: Arc<JsonTradeFileStore>) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();

    let watcher = store.spawn_watcher(config.trade_store.watch_interval(), shutdown.clone());
    let monitor = Arc::new(PerformanceMonitor::new(
        Arc::clone(&store),
        config.trade_store.initial_balance,
    ));
    let mut reports = monitor.subscribe();
    let monitor_task = monitor.spawn(shutdown.clone());

    let log_shutdown = shutdown.clone();
    let logger = tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = reports.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let report = reports.borrow_and_update().clone();
                    tracing::info!(
                        revision = report.revision,
                        max_consecutive_wins = report.streaks.max_consecutive_wins,
                        max_consecutive_losses = report.streaks.max_consecutive_losses,
                        "Performance updated"
                    );
                    log_summary("Overall", &report.overall);
                    for (strategy, stats) in &report.by_strategy {
                        log_summary(strategy, stats);
                    }
                }
                () = log_shutdown.cancelled() => break,
            }
        }
    });

    shutdown_signal().await;
    shutdown.cancel();

    let _ = tokio::join!(watcher, monitor_task, logger);
    tracing::info!("Performance engine stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
