//! Backtest jobs: requests, task lifecycle, and result trades.

use std::fmt;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::trade::ClosedTrade;

/// Strategy selector meaning "run every strategy".
pub const ALL_STRATEGIES: &str = "both";

/// Strategies the `both` selector expands to.
pub const DEFAULT_STRATEGIES: [&str; 2] = ["trend_rider", "range_rider"];

// =============================================================================
// Task lifecycle
// =============================================================================

/// Server-side status of a backtest task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Accepted, waiting for a worker.
    Queued,
    /// Being computed.
    Running,
    /// Finished; results are available.
    Complete,
    /// Finished with an error.
    Failed,
}

impl TaskStatus {
    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest known state of a submitted backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestTask {
    /// Server-assigned task id.
    pub task_id: String,
    /// Current status.
    pub status: TaskStatus,
    /// Completion percentage, clamped to `[0, 100]`.
    pub progress: f64,
    /// Human-readable status message.
    pub message: String,
    /// Estimated time remaining.
    pub eta: Option<Duration>,
    /// When the server started the task.
    pub started_at: Option<NaiveDateTime>,
    /// When the server finished the task.
    pub completed_at: Option<NaiveDateTime>,
}

impl BacktestTask {
    /// Task as it exists right after submission.
    #[must_use]
    pub fn submitted(task_id: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            task_id: task_id.into(),
            status,
            progress: 0.0,
            message: String::new(),
            eta: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Whether the task has reached `complete` or `failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Which results endpoint a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// One symbol, one strategy selector.
    SinglePair,
    /// Several symbols and strategies.
    MultiPair,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SinglePair => f.write_str("single_pair"),
            Self::MultiPair => f.write_str("multi_pair"),
        }
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Request validation failures. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    /// No symbol selected.
    #[error("at least one symbol must be selected")]
    NoSymbols,

    /// No strategy selected.
    #[error("at least one strategy must be selected")]
    NoStrategies,

    /// Date range is empty or inverted.
    #[error("start date {start} must be before end date {end}")]
    InvalidDateRange {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },

    /// Initial balance is not positive.
    #[error("initial balance must be positive, got {0}")]
    InvalidBalance(Decimal),

    /// Risk setting out of range.
    #[error("risk must be in (0, {max}], got {value}")]
    InvalidRisk {
        /// Requested risk.
        value: Decimal,
        /// Upper bound.
        max: Decimal,
    },

    /// Position limit out of range.
    #[error("max positions must be between 1 and 10, got {0}")]
    InvalidMaxPositions(u32),
}

const MAX_POSITIONS: u32 = 10;
const MAX_RISK_PERCENT: Decimal = dec!(10);
const MAX_RISK_FRACTION: Decimal = dec!(0.10);

/// Single-pair backtest request (`POST /backtest/run`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    /// Symbol to test.
    pub symbol: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Strategy name or `both`.
    pub strategy: String,
    /// Starting balance.
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_balance: Decimal,
    /// Risk per trade in percent (2.0 = 2%).
    #[serde(with = "rust_decimal::serde::float")]
    pub risk_percent: Decimal,
    /// Maximum concurrent positions.
    pub max_positions: u32,
}

impl BacktestRequest {
    /// Request with the service defaults.
    #[must_use]
    pub fn new(symbol: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            start_date,
            end_date,
            strategy: ALL_STRATEGIES.to_string(),
            initial_balance: dec!(10000),
            risk_percent: dec!(2.0),
            max_positions: 2,
        }
    }

    /// Validate before submission.
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if self.symbol.trim().is_empty() {
            return Err(RequestValidationError::NoSymbols);
        }
        if self.strategy.trim().is_empty() {
            return Err(RequestValidationError::NoStrategies);
        }
        validate_common(
            self.start_date,
            self.end_date,
            self.initial_balance,
            self.risk_percent,
            MAX_RISK_PERCENT,
            self.max_positions,
        )
    }
}

/// Engine settings for a multi-pair run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPairConfig {
    /// Starting balance.
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_balance: Decimal,
    /// Risk per trade as a fraction (0.02 = 2%).
    #[serde(with = "rust_decimal::serde::float")]
    pub risk_percent: Decimal,
    /// Maximum concurrent positions.
    pub max_concurrent_positions: u32,
    /// Minimum signal confidence to enter.
    #[serde(with = "rust_decimal::serde::float")]
    pub min_confidence: Decimal,
    /// Take-profit distance in R.
    #[serde(with = "rust_decimal::serde::float")]
    pub take_profit_r: Decimal,
}

impl Default for MultiPairConfig {
    fn default() -> Self {
        Self {
            initial_balance: dec!(10000),
            risk_percent: dec!(0.02),
            max_concurrent_positions: 2,
            min_confidence: dec!(50),
            take_profit_r: dec!(2),
        }
    }
}

/// Multi-pair backtest request (`POST /backtest/multi-pair`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPairBacktestRequest {
    /// Symbols to test.
    pub pairs: Vec<String>,
    /// Strategies to run.
    pub strategies: Vec<String>,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Bar timeframe.
    pub timeframe: String,
    /// Engine settings.
    pub config: MultiPairConfig,
}

impl MultiPairBacktestRequest {
    /// Validate before submission.
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if self.pairs.is_empty() || self.pairs.iter().any(|p| p.trim().is_empty()) {
            return Err(RequestValidationError::NoSymbols);
        }
        if self.strategies.is_empty() || self.strategies.iter().any(|s| s.trim().is_empty()) {
            return Err(RequestValidationError::NoStrategies);
        }
        validate_common(
            self.start_date,
            self.end_date,
            self.config.initial_balance,
            self.config.risk_percent,
            MAX_RISK_FRACTION,
            self.config.max_concurrent_positions,
        )
    }
}

fn validate_common(
    start: NaiveDate,
    end: NaiveDate,
    balance: Decimal,
    risk: Decimal,
    max_risk: Decimal,
    max_positions: u32,
) -> Result<(), RequestValidationError> {
    if start >= end {
        return Err(RequestValidationError::InvalidDateRange { start, end });
    }
    if balance <= Decimal::ZERO {
        return Err(RequestValidationError::InvalidBalance(balance));
    }
    if risk <= Decimal::ZERO || risk > max_risk {
        return Err(RequestValidationError::InvalidRisk {
            value: risk,
            max: max_risk,
        });
    }
    if max_positions == 0 || max_positions > MAX_POSITIONS {
        return Err(RequestValidationError::InvalidMaxPositions(max_positions));
    }
    Ok(())
}

/// What the operator picked before starting a run.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSelection {
    /// Selected symbols.
    pub pairs: Vec<String>,
    /// Strategy name or `both`.
    pub strategy: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Starting balance.
    pub initial_balance: Decimal,
    /// Risk per trade in percent (2.0 = 2%).
    pub risk_percent: Decimal,
    /// Maximum concurrent positions.
    pub max_positions: u32,
}

/// A validated-on-submit backtest request of either shape.
#[derive(Debug, Clone, PartialEq)]
pub enum BacktestSubmission {
    /// One symbol.
    SinglePair(BacktestRequest),
    /// Several symbols.
    MultiPair(MultiPairBacktestRequest),
}

impl BacktestSubmission {
    /// Build the request shape matching the selection.
    ///
    /// Pairs are trimmed and blank entries dropped first. Exactly one pair
    /// uses the single-pair endpoint; anything else goes to the multi-pair
    /// endpoint, where `both` expands to every default strategy and the risk
    /// percentage is converted to a fraction.
    #[must_use]
    pub fn from_selection(selection: BacktestSelection) -> Self {
        let pairs: Vec<String> = selection
            .pairs
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(ToString::to_string)
            .collect();

        if let [symbol] = pairs.as_slice() {
            return Self::SinglePair(BacktestRequest {
                symbol: symbol.clone(),
                start_date: selection.start_date,
                end_date: selection.end_date,
                strategy: selection.strategy,
                initial_balance: selection.initial_balance,
                risk_percent: selection.risk_percent,
                max_positions: selection.max_positions,
            });
        }

        let strategies = if selection.strategy.eq_ignore_ascii_case(ALL_STRATEGIES) {
            DEFAULT_STRATEGIES.iter().map(ToString::to_string).collect()
        } else if selection.strategy.trim().is_empty() {
            Vec::new()
        } else {
            vec![selection.strategy]
        };

        Self::MultiPair(MultiPairBacktestRequest {
            pairs,
            strategies,
            start_date: selection.start_date,
            end_date: selection.end_date,
            timeframe: "M15".to_string(),
            config: MultiPairConfig {
                initial_balance: selection.initial_balance,
                risk_percent: selection.risk_percent / Decimal::ONE_HUNDRED,
                max_concurrent_positions: selection.max_positions,
                ..MultiPairConfig::default()
            },
        })
    }

    /// Endpoint family of this submission.
    #[must_use]
    pub const fn kind(&self) -> JobKind {
        match self {
            Self::SinglePair(_) => JobKind::SinglePair,
            Self::MultiPair(_) => JobKind::MultiPair,
        }
    }

    /// Number of symbols covered.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        match self {
            Self::SinglePair(_) => 1,
            Self::MultiPair(r) => r.pairs.len(),
        }
    }

    /// Validate before submission.
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        match self {
            Self::SinglePair(r) => r.validate(),
            Self::MultiPair(r) => r.validate(),
        }
    }
}

// =============================================================================
// Result trades
// =============================================================================

/// A trade produced by the backtest engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestTrade {
    /// Engine position id.
    #[serde(default)]
    pub position_id: i64,
    /// Symbol.
    pub symbol: String,
    /// Direction as reported by the engine (`LONG`/`SHORT`/`BUY`/`SELL`).
    #[serde(default)]
    pub side: String,
    /// Strategy that opened the position.
    #[serde(default)]
    pub strategy: String,
    /// Signal confidence.
    #[serde(default)]
    pub confidence: Decimal,
    /// Market regime label.
    #[serde(default)]
    pub regime: Option<String>,
    /// Entry time.
    #[serde(default, deserialize_with = "super::time::deserialize_lenient")]
    pub entry_time: Option<NaiveDateTime>,
    /// Exit time, absent for positions still open at the end of the run.
    #[serde(default, deserialize_with = "super::time::deserialize_lenient")]
    pub exit_time: Option<NaiveDateTime>,
    /// Entry price.
    pub entry_price: Decimal,
    /// Exit price.
    #[serde(default)]
    pub exit_price: Option<Decimal>,
    /// Stop-loss level.
    #[serde(default)]
    pub stop_loss: Option<Decimal>,
    /// Take-profit level.
    #[serde(default)]
    pub take_profit: Option<Decimal>,
    /// Outcome in R.
    #[serde(default)]
    pub r_multiple: Option<Decimal>,
    /// Realized profit.
    #[serde(default)]
    pub profit_loss: Option<Decimal>,
    /// Why the position closed.
    #[serde(default)]
    pub exit_reason: Option<String>,
}

impl ClosedTrade for BacktestTrade {
    fn opened_at(&self) -> NaiveDateTime {
        self.entry_time.unwrap_or(NaiveDateTime::MIN)
    }

    fn outcome_r(&self) -> Decimal {
        self.r_multiple.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn selection(pairs: &[&str], strategy: &str) -> BacktestSelection {
        BacktestSelection {
            pairs: pairs.iter().map(ToString::to_string).collect(),
            strategy: strategy.to_string(),
            start_date: date("2024-01-01"),
            end_date: date("2024-01-31"),
            initial_balance: dec!(10000),
            risk_percent: dec!(2),
            max_positions: 2,
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(!TaskStatus::Queued.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
        assert!(TaskStatus::Complete.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
    }

    #[test]
    fn status_wire_format_is_lowercase() {
        let json = serde_json::to_string(&TaskStatus::Complete).unwrap();
        assert_eq!(json, "\"complete\"");
        let parsed: TaskStatus = serde_json::from_str("\"running\"").unwrap();
        assert_eq!(parsed, TaskStatus::Running);
    }

    #[test]
    fn single_pair_selection_uses_single_endpoint() {
        let submission = BacktestSubmission::from_selection(selection(&["EURUSD"], "both"));
        assert_eq!(submission.kind(), JobKind::SinglePair);
        let BacktestSubmission::SinglePair(request) = submission else {
            panic!("expected single-pair request");
        };
        assert_eq!(request.symbol, "EURUSD");
        assert_eq!(request.strategy, "both");
        assert_eq!(request.risk_percent, dec!(2));
    }

    #[test]
    fn multi_pair_selection_expands_both_and_converts_risk() {
        let submission =
            BacktestSubmission::from_selection(selection(&["EURUSD", "GBPUSD"], "both"));
        let BacktestSubmission::MultiPair(request) = submission else {
            panic!("expected multi-pair request");
        };
        assert_eq!(request.strategies, vec!["trend_rider", "range_rider"]);
        assert_eq!(request.config.risk_percent, dec!(0.02));
        assert_eq!(request.timeframe, "M15");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn multi_pair_selection_keeps_named_strategy() {
        let submission =
            BacktestSubmission::from_selection(selection(&["EURUSD", "GBPUSD"], "range_rider"));
        let BacktestSubmission::MultiPair(request) = submission else {
            panic!("expected multi-pair request");
        };
        assert_eq!(request.strategies, vec!["range_rider"]);
    }

    #[test]
    fn empty_selection_fails_validation() {
        let submission = BacktestSubmission::from_selection(selection(&[], "both"));
        assert_eq!(submission.validate(), Err(RequestValidationError::NoSymbols));
    }

    #[test]
    fn blank_pairs_are_dropped_from_selection() {
        let submission = BacktestSubmission::from_selection(selection(&["EURUSD", "  "], "both"));
        let BacktestSubmission::SinglePair(request) = submission else {
            panic!("expected single-pair request");
        };
        assert_eq!(request.symbol, "EURUSD");

        let submission =
            BacktestSubmission::from_selection(selection(&[" GBPUSD ", "", "USDJPY"], "both"));
        let BacktestSubmission::MultiPair(request) = submission else {
            panic!("expected multi-pair request");
        };
        assert_eq!(request.pairs, vec!["GBPUSD", "USDJPY"]);

        let submission = BacktestSubmission::from_selection(selection(&["", " "], "both"));
        assert_eq!(submission.validate(), Err(RequestValidationError::NoSymbols));
    }

    #[test]
    fn any_blank_entry_fails_multi_pair_validation() {
        let BacktestSubmission::MultiPair(mut request) =
            BacktestSubmission::from_selection(selection(&["EURUSD", "GBPUSD"], "both"))
        else {
            panic!("expected multi-pair request");
        };
        request.pairs.push(" ".to_string());
        assert_eq!(request.validate(), Err(RequestValidationError::NoSymbols));

        request.pairs.pop();
        request.strategies.push(String::new());
        assert_eq!(request.validate(), Err(RequestValidationError::NoStrategies));
    }

    #[test]
    fn empty_strategy_fails_validation() {
        let submission = BacktestSubmission::from_selection(selection(&["EURUSD", "USDJPY"], ""));
        assert_eq!(
            submission.validate(),
            Err(RequestValidationError::NoStrategies)
        );
    }

    #[test]
    fn inverted_dates_fail_validation() {
        let mut request = BacktestRequest::new("EURUSD", date("2024-02-01"), date("2024-01-01"));
        assert!(matches!(
            request.validate(),
            Err(RequestValidationError::InvalidDateRange { .. })
        ));
        request.end_date = date("2024-02-01");
        assert!(matches!(
            request.validate(),
            Err(RequestValidationError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn risk_and_positions_are_bounded() {
        let mut request = BacktestRequest::new("EURUSD", date("2024-01-01"), date("2024-02-01"));
        assert!(request.validate().is_ok());

        request.risk_percent = dec!(10.5);
        assert!(matches!(
            request.validate(),
            Err(RequestValidationError::InvalidRisk { .. })
        ));

        request.risk_percent = dec!(1);
        request.max_positions = 11;
        assert_eq!(
            request.validate(),
            Err(RequestValidationError::InvalidMaxPositions(11))
        );

        request.max_positions = 1;
        request.initial_balance = Decimal::ZERO;
        assert_eq!(
            request.validate(),
            Err(RequestValidationError::InvalidBalance(Decimal::ZERO))
        );
    }

    #[test]
    fn request_serializes_numbers_as_floats() {
        let request = BacktestRequest::new("EURUSD", date("2024-01-01"), date("2024-01-31"));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["symbol"], "EURUSD");
        assert_eq!(value["start_date"], "2024-01-01");
        assert_eq!(value["initial_balance"], 10000.0);
        assert_eq!(value["risk_percent"], 2.0);
        assert_eq!(value["max_positions"], 2);
    }

    #[test]
    fn backtest_trade_tolerates_open_positions() {
        let trade: BacktestTrade = serde_json::from_value(serde_json::json!({
            "position_id": 7,
            "symbol": "GBPUSD",
            "side": "LONG",
            "strategy": "TREND_RIDER",
            "entry_time": "2024-01-03T09:15:00",
            "exit_time": null,
            "entry_price": 1.2701,
            "exit_price": null,
            "r_multiple": null,
        }))
        .unwrap();
        assert!(trade.exit_time.is_none());
        assert_eq!(trade.outcome_r(), Decimal::ZERO);
        assert!(trade.entry_time.is_some());
    }
}
