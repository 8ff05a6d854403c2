//! Backtest Job Client
//!
//! Drives one backtest through `Submitted -> Polling -> {Complete, Failed}`:
//! validates and submits, polls status at a fixed interval reporting progress
//! after every poll, fetches and reconciles results exactly once on
//! completion. Polling stops on cancellation or when the configured maximum
//! duration elapses.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::result_reconciler::{ResultPayload, ResultReconciler};
use crate::application::dto::BacktestReport;
use crate::application::ports::{BacktestService, BacktestServiceError};
use crate::domain::{
    BacktestSubmission, BacktestTask, JobKind, RequestValidationError, TaskStatus,
};
use crate::observability::metrics::{record_backtest_job, record_backtest_poll};

/// Polling cadence and bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between status polls.
    pub interval: Duration,
    /// Give up after this long; `None` polls until a terminal status.
    pub max_duration: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_duration: Some(Duration::from_secs(30 * 60)),
        }
    }
}

/// Snapshot handed to the progress callback after each status poll.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Task id.
    pub task_id: String,
    /// Reported status.
    pub status: TaskStatus,
    /// Completion percentage (0-100).
    pub percent: f64,
    /// Server message.
    pub message: String,
    /// Estimated time remaining.
    pub eta: Option<Duration>,
}

impl From<&BacktestTask> for ProgressUpdate {
    fn from(task: &BacktestTask) -> Self {
        Self {
            task_id: task.task_id.clone(),
            status: task.status,
            percent: task.progress,
            message: task.message.clone(),
            eta: task.eta,
        }
    }
}

/// Client-side job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Accepted by the service, not yet polled.
    Submitted,
    /// Being polled.
    Polling,
    /// Results fetched and reconciled.
    Complete,
    /// Failed, cancelled, or timed out.
    Failed,
}

impl JobState {
    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Whether `next` is a legal successor.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Submitted, Self::Polling | Self::Failed)
                | (Self::Polling, Self::Polling | Self::Complete | Self::Failed)
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Submitted => "submitted",
            Self::Polling => "polling",
            Self::Complete => "complete",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Backtest job errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestJobError {
    /// Request rejected before any network call.
    #[error("invalid backtest request: {0}")]
    Validation(#[from] RequestValidationError),

    /// Talking to the service failed.
    #[error(transparent)]
    Transport(#[from] BacktestServiceError),

    /// The service reported the task as failed.
    #[error("backtest {task_id} failed: {message}")]
    JobFailed {
        /// Task id.
        task_id: String,
        /// Server-provided message.
        message: String,
    },

    /// Cancelled before reaching a terminal status.
    #[error("backtest {task_id} cancelled")]
    Cancelled {
        /// Task id.
        task_id: String,
    },

    /// Maximum poll duration elapsed.
    #[error("backtest {task_id} timed out after {elapsed:?}")]
    TimedOut {
        /// Task id.
        task_id: String,
        /// Time spent since submission.
        elapsed: Duration,
    },

    /// Completed, but the result payload matched no known schema.
    #[error("backtest {task_id} returned an unrecognized result payload")]
    UnrecognizedResult {
        /// Task id.
        task_id: String,
    },

    /// The job already reached a terminal state.
    #[error("backtest {task_id} is already {state}")]
    AlreadyTerminal {
        /// Task id.
        task_id: String,
        /// Terminal state.
        state: JobState,
    },
}

impl BacktestJobError {
    /// Metric label.
    const fn outcome(&self) -> &'static str {
        match self {
            Self::JobFailed { .. } => "failed",
            Self::Cancelled { .. } => "cancelled",
            Self::TimedOut { .. } => "timed_out",
            _ => "error",
        }
    }
}

/// One submitted backtest.
#[derive(Debug, Clone)]
pub struct BacktestJob {
    task: BacktestTask,
    kind: JobKind,
    state: JobState,
    submitted_at: Instant,
}

impl BacktestJob {
    /// Task id.
    #[must_use]
    pub fn task_id(&self) -> &str {
        &self.task.task_id
    }

    /// Latest task snapshot.
    #[must_use]
    pub const fn task(&self) -> &BacktestTask {
        &self.task
    }

    /// Result shape.
    #[must_use]
    pub const fn kind(&self) -> JobKind {
        self.kind
    }

    /// Client-side state.
    #[must_use]
    pub const fn state(&self) -> JobState {
        self.state
    }

    /// Time since submission.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.submitted_at.elapsed()
    }

    fn advance(&mut self, next: JobState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal job transition {} -> {next}",
            self.state
        );
        self.state = next;
    }
}

/// Result of one status poll.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// Still queued or running.
    Pending(TaskStatus),
    /// Completed; results fetched and reconciled.
    Complete(Box<BacktestReport>),
}

/// Submits backtests and polls them to a terminal state.
pub struct BacktestJobClient<S: BacktestService + ?Sized> {
    service: Arc<S>,
    poll: PollSettings,
}

impl<S: BacktestService + ?Sized> BacktestJobClient<S> {
    /// Create a client over `service`.
    #[must_use]
    pub const fn new(service: Arc<S>, poll: PollSettings) -> Self {
        Self { service, poll }
    }

    /// Polling settings.
    #[must_use]
    pub const fn poll_settings(&self) -> PollSettings {
        self.poll
    }

    /// Validate and submit.
    ///
    /// Validation failures return before any network call. On success the
    /// job is in [`JobState::Polling`].
    pub async fn submit(
        &self,
        submission: &BacktestSubmission,
    ) -> Result<BacktestJob, BacktestJobError> {
        submission.validate()?;

        let ack = self.service.submit(submission).await?;

        let mut job = BacktestJob {
            task: BacktestTask::submitted(ack.task_id, ack.status),
            kind: submission.kind(),
            state: JobState::Submitted,
            submitted_at: Instant::now(),
        };
        job.advance(JobState::Polling);

        tracing::info!(
            task_id = %job.task_id(),
            kind = %job.kind,
            status = %job.task.status,
            "Backtest submitted"
        );

        Ok(job)
    }

    /// Issue one status call and report it.
    ///
    /// On `complete` the results are fetched and reconciled (one call) and
    /// the job becomes [`JobState::Complete`]. On `failed`, or on any error,
    /// the job becomes [`JobState::Failed`].
    pub async fn poll_once<F>(
        &self,
        job: &mut BacktestJob,
        on_progress: &mut F,
    ) -> Result<PollOutcome, BacktestJobError>
    where
        F: FnMut(ProgressUpdate) + Send,
    {
        if job.state.is_terminal() {
            return Err(BacktestJobError::AlreadyTerminal {
                task_id: job.task.task_id.clone(),
                state: job.state,
            });
        }

        let task = match self.service.status(&job.task.task_id).await {
            Ok(task) => task,
            Err(e) => return Err(Self::fail(job, e.into())),
        };

        record_backtest_poll(task.status.as_str());
        tracing::debug!(
            task_id = %task.task_id,
            status = %task.status,
            progress = task.progress,
            message = %task.message,
            "Backtest status"
        );

        job.task = BacktestTask {
            task_id: job.task.task_id.clone(),
            ..task
        };
        job.advance(JobState::Polling);
        on_progress(ProgressUpdate::from(&job.task));

        match job.task.status {
            TaskStatus::Queued | TaskStatus::Running => Ok(PollOutcome::Pending(job.task.status)),
            TaskStatus::Failed => {
                let message = if job.task.message.is_empty() {
                    "no message from service".to_string()
                } else {
                    job.task.message.clone()
                };
                let err = BacktestJobError::JobFailed {
                    task_id: job.task.task_id.clone(),
                    message,
                };
                Err(Self::fail(job, err))
            }
            TaskStatus::Complete => {
                let payload = match self.service.results(job.kind, &job.task.task_id).await {
                    Ok(payload) => payload,
                    Err(e) => return Err(Self::fail(job, e.into())),
                };

                let Some(report) = ResultReconciler::reconcile(ResultPayload::parse(payload))
                else {
                    let err = BacktestJobError::UnrecognizedResult {
                        task_id: job.task.task_id.clone(),
                    };
                    return Err(Self::fail(job, err));
                };

                job.advance(JobState::Complete);
                record_backtest_job("complete", job.elapsed().as_secs_f64());
                tracing::info!(
                    task_id = %job.task.task_id,
                    trades = report.summary.total_trades,
                    elapsed_ms = job.elapsed().as_millis(),
                    "Backtest complete"
                );

                Ok(PollOutcome::Complete(Box::new(report)))
            }
        }
    }

    /// Poll until a terminal status, cancellation, or timeout.
    ///
    /// Cancellation and the deadline are checked before every poll; the
    /// inter-poll delay is cut short by cancellation.
    pub async fn wait_for_completion<F>(
        &self,
        job: &mut BacktestJob,
        mut on_progress: F,
        cancel: &CancellationToken,
    ) -> Result<BacktestReport, BacktestJobError>
    where
        F: FnMut(ProgressUpdate) + Send,
    {
        loop {
            if cancel.is_cancelled() {
                tracing::info!(task_id = %job.task.task_id, "Backtest polling cancelled");
                let err = BacktestJobError::Cancelled {
                    task_id: job.task.task_id.clone(),
                };
                return Err(Self::fail(job, err));
            }

            if let Some(max) = self.poll.max_duration
                && job.elapsed() >= max
            {
                let err = BacktestJobError::TimedOut {
                    task_id: job.task.task_id.clone(),
                    elapsed: job.elapsed(),
                };
                return Err(Self::fail(job, err));
            }

            if let PollOutcome::Complete(report) = self.poll_once(job, &mut on_progress).await? {
                return Ok(*report);
            }

            tokio::select! {
                () = tokio::time::sleep(self.poll.interval) => {}
                () = cancel.cancelled() => {}
            }
        }
    }

    /// Submit and poll to completion.
    pub async fn run<F>(
        &self,
        submission: &BacktestSubmission,
        on_progress: F,
        cancel: &CancellationToken,
    ) -> Result<BacktestReport, BacktestJobError>
    where
        F: FnMut(ProgressUpdate) + Send,
    {
        let mut job = self.submit(submission).await?;
        self.wait_for_completion(&mut job, on_progress, cancel).await
    }

    fn fail(job: &mut BacktestJob, err: BacktestJobError) -> BacktestJobError {
        job.advance(JobState::Failed);
        record_backtest_job(err.outcome(), job.elapsed().as_secs_f64());
        tracing::warn!(
            task_id = %job.task.task_id,
            error = %err,
            "Backtest job failed"
        );
        err
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::application::ports::{
        HealthStatus, OhlcResolution, OhlcSeries, ServiceInfo, SubmitAck,
    };
    use crate::domain::{BacktestRequest, BacktestSelection, MultiPairBacktestRequest};

    // Mock service replaying a scripted sequence of status responses
    struct ScriptedService {
        statuses: Mutex<VecDeque<Result<BacktestTask, BacktestServiceError>>>,
        results: serde_json::Value,
        submit_calls: AtomicUsize,
        status_calls: AtomicUsize,
        results_calls: AtomicUsize,
    }

    impl ScriptedService {
        fn new(script: Vec<Result<BacktestTask, BacktestServiceError>>) -> Self {
            Self {
                statuses: Mutex::new(script.into()),
                results: single_payload(),
                submit_calls: AtomicUsize::new(0),
                status_calls: AtomicUsize::new(0),
                results_calls: AtomicUsize::new(0),
            }
        }

        fn with_results(mut self, results: serde_json::Value) -> Self {
            self.results = results;
            self
        }

        fn submits(&self) -> usize {
            self.submit_calls.load(Ordering::SeqCst)
        }

        fn polls(&self) -> usize {
            self.status_calls.load(Ordering::SeqCst)
        }

        fn result_fetches(&self) -> usize {
            self.results_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BacktestService for ScriptedService {
        async fn health(&self) -> Result<HealthStatus, BacktestServiceError> {
            Ok(HealthStatus {
                status: "healthy".to_string(),
                version: "test".to_string(),
                uptime_seconds: 1.0,
            })
        }

        async fn info(&self) -> Result<ServiceInfo, BacktestServiceError> {
            Ok(ServiceInfo::default())
        }

        async fn submit(
            &self,
            _submission: &BacktestSubmission,
        ) -> Result<SubmitAck, BacktestServiceError> {
            self.submit_calls.fetch_add(1, Ordering::SeqCst);
            Ok(SubmitAck {
                task_id: "task-1".to_string(),
                status: TaskStatus::Queued,
            })
        }

        async fn status(&self, task_id: &str) -> Result<BacktestTask, BacktestServiceError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            self.statuses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(task(task_id, TaskStatus::Running, 50.0, "Simulating")))
        }

        async fn results(
            &self,
            _kind: JobKind,
            _task_id: &str,
        ) -> Result<serde_json::Value, BacktestServiceError> {
            self.results_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.results.clone())
        }

        async fn ohlc(
            &self,
            _task_id: &str,
            _resolution: OhlcResolution,
        ) -> Result<OhlcSeries, BacktestServiceError> {
            Err(BacktestServiceError::NotFound {
                resource: "ohlc".to_string(),
            })
        }
    }

    fn task(task_id: &str, status: TaskStatus, progress: f64, message: &str) -> BacktestTask {
        BacktestTask {
            progress,
            message: message.to_string(),
            ..BacktestTask::submitted(task_id, status)
        }
    }

    fn running(progress: f64) -> Result<BacktestTask, BacktestServiceError> {
        Ok(task("task-1", TaskStatus::Running, progress, "Simulating"))
    }

    fn complete() -> Result<BacktestTask, BacktestServiceError> {
        Ok(task("task-1", TaskStatus::Complete, 100.0, "Done"))
    }

    fn single_payload() -> serde_json::Value {
        json!({
            "task_id": "task-1",
            "symbol": "EURUSD",
            "initial_balance": 10000.0,
            "final_balance": 10250.0,
            "net_profit": 250.0,
            "total_trades": 2,
            "winning_trades": 1,
            "losing_trades": 1,
            "trades": [],
            "equity_curve": []
        })
    }

    fn submission() -> BacktestSubmission {
        BacktestSubmission::SinglePair(BacktestRequest::new(
            "EURUSD",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        ))
    }

    fn fast() -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(1),
            max_duration: Some(Duration::from_secs(5)),
        }
    }

    #[tokio::test]
    async fn running_three_times_then_complete() {
        let service = Arc::new(ScriptedService::new(vec![
            running(10.0),
            running(40.0),
            running(80.0),
            complete(),
        ]));
        let client = BacktestJobClient::new(Arc::clone(&service), fast());
        let mut updates = Vec::new();

        let report = client
            .run(&submission(), |u| updates.push(u), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(service.submits(), 1);
        assert_eq!(service.polls(), 4);
        assert_eq!(service.result_fetches(), 1);
        assert_eq!(updates.len(), 4);
        assert_eq!(updates[3].status, TaskStatus::Complete);
        assert_eq!(report.summary.total_trades, 2);
    }

    #[tokio::test]
    async fn progress_reported_even_when_unchanged() {
        let service = Arc::new(ScriptedService::new(vec![
            running(50.0),
            running(50.0),
            complete(),
        ]));
        let client = BacktestJobClient::new(Arc::clone(&service), fast());
        let mut percents = Vec::new();

        client
            .run(&submission(), |u| percents.push(u.percent), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(percents, vec![50.0, 50.0, 100.0]);
    }

    #[tokio::test]
    async fn failed_on_first_poll_fetches_no_results() {
        let service = Arc::new(ScriptedService::new(vec![Ok(task(
            "task-1",
            TaskStatus::Failed,
            0.0,
            "No data for EURUSD",
        ))]));
        let client = BacktestJobClient::new(Arc::clone(&service), fast());

        let mut job = client.submit(&submission()).await.unwrap();
        let err = client
            .wait_for_completion(&mut job, |_| {}, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            BacktestJobError::JobFailed {
                task_id: "task-1".to_string(),
                message: "No data for EURUSD".to_string(),
            }
        );
        assert_eq!(job.state(), JobState::Failed);
        assert_eq!(service.polls(), 1);
        assert_eq!(service.result_fetches(), 0);
    }

    #[tokio::test]
    async fn empty_symbol_list_fails_before_network() {
        let service = Arc::new(ScriptedService::new(vec![]));
        let client = BacktestJobClient::new(Arc::clone(&service), fast());

        let selection = BacktestSelection {
            pairs: vec![],
            strategy: "both".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            initial_balance: rust_decimal_macros::dec!(10000),
            risk_percent: rust_decimal_macros::dec!(2),
            max_positions: 2,
        };
        let err = client
            .submit(&BacktestSubmission::from_selection(selection))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            BacktestJobError::Validation(RequestValidationError::NoSymbols)
        );
        assert_eq!(service.submits(), 0);
        assert_eq!(service.polls(), 0);
    }

    #[tokio::test]
    async fn empty_strategy_list_fails_before_network() {
        let service = Arc::new(ScriptedService::new(vec![]));
        let client = BacktestJobClient::new(Arc::clone(&service), fast());

        let request = MultiPairBacktestRequest {
            strategies: vec![],
            ..multi_request()
        };
        let err = client
            .submit(&BacktestSubmission::MultiPair(request))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            BacktestJobError::Validation(RequestValidationError::NoStrategies)
        );
        assert_eq!(service.submits(), 0);
    }

    fn multi_request() -> MultiPairBacktestRequest {
        MultiPairBacktestRequest {
            pairs: vec!["EURUSD".to_string(), "GBPUSD".to_string()],
            strategies: vec!["trend_rider".to_string()],
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            timeframe: "M15".to_string(),
            config: crate::domain::MultiPairConfig::default(),
        }
    }

    #[tokio::test]
    async fn cancellation_stops_before_next_poll() {
        let service = Arc::new(ScriptedService::new(vec![]));
        let client = BacktestJobClient::new(
            Arc::clone(&service),
            PollSettings {
                interval: Duration::from_secs(60),
                max_duration: None,
            },
        );
        let cancel = CancellationToken::new();
        let mut job = client.submit(&submission()).await.unwrap();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = client
            .wait_for_completion(&mut job, |_| {}, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, BacktestJobError::Cancelled { .. }));
        assert_eq!(job.state(), JobState::Failed);
        assert_eq!(service.polls(), 1);
    }

    #[tokio::test]
    async fn already_cancelled_issues_no_poll() {
        let service = Arc::new(ScriptedService::new(vec![]));
        let client = BacktestJobClient::new(Arc::clone(&service), fast());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = client
            .run(&submission(), |_| {}, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, BacktestJobError::Cancelled { .. }));
        assert_eq!(service.polls(), 0);
    }

    #[tokio::test]
    async fn max_duration_bounds_polling() {
        let service = Arc::new(ScriptedService::new(vec![]));
        let client = BacktestJobClient::new(
            Arc::clone(&service),
            PollSettings {
                interval: Duration::from_millis(5),
                max_duration: Some(Duration::from_millis(40)),
            },
        );

        let err = client
            .run(&submission(), |_| {}, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, BacktestJobError::TimedOut { .. }));
        assert!(service.polls() >= 1);
        assert_eq!(service.result_fetches(), 0);
    }

    #[tokio::test]
    async fn terminal_job_cannot_be_polled_again() {
        let service = Arc::new(ScriptedService::new(vec![complete()]));
        let client = BacktestJobClient::new(Arc::clone(&service), fast());
        let mut job = client.submit(&submission()).await.unwrap();

        client
            .wait_for_completion(&mut job, |_| {}, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(job.state(), JobState::Complete);

        let err = client.poll_once(&mut job, &mut |_: ProgressUpdate| {}).await.unwrap_err();
        assert!(matches!(
            err,
            BacktestJobError::AlreadyTerminal {
                state: JobState::Complete,
                ..
            }
        ));
        assert_eq!(service.polls(), 1);
        assert_eq!(service.result_fetches(), 1);
    }

    #[tokio::test]
    async fn transport_error_fails_the_job() {
        let service = Arc::new(ScriptedService::new(vec![
            running(5.0),
            Err(BacktestServiceError::Connection {
                message: "connection refused".to_string(),
            }),
        ]));
        let client = BacktestJobClient::new(Arc::clone(&service), fast());

        let err = client
            .run(&submission(), |_| {}, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, BacktestJobError::Transport(_)));
        assert_eq!(service.result_fetches(), 0);
    }

    #[tokio::test]
    async fn unrecognized_results_fail_the_job() {
        let service = Arc::new(
            ScriptedService::new(vec![complete()]).with_results(json!({"detail": "gone"})),
        );
        let client = BacktestJobClient::new(Arc::clone(&service), fast());

        let err = client
            .run(&submission(), |_| {}, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, BacktestJobError::UnrecognizedResult { .. }));
        assert_eq!(service.result_fetches(), 1);
    }

    #[test]
    fn state_transitions() {
        assert!(JobState::Submitted.can_transition_to(JobState::Polling));
        assert!(JobState::Polling.can_transition_to(JobState::Polling));
        assert!(JobState::Polling.can_transition_to(JobState::Complete));
        assert!(JobState::Polling.can_transition_to(JobState::Failed));
        assert!(!JobState::Submitted.can_transition_to(JobState::Complete));
        assert!(!JobState::Complete.can_transition_to(JobState::Polling));
        assert!(!JobState::Failed.can_transition_to(JobState::Complete));
    }

    #[test]
    fn default_poll_settings_are_bounded() {
        let settings = PollSettings::default();
        assert_eq!(settings.interval, Duration::from_secs(1));
        assert_eq!(settings.max_duration, Some(Duration::from_secs(1800)));
    }
}
