//! HTTP backtest service adapter implementing `BacktestService`.

use async_trait::async_trait;

use crate::application::ports::{
    BacktestService, BacktestServiceError, HealthStatus, OhlcResolution, OhlcSeries, ServiceInfo,
    SubmitAck,
};
use crate::domain::{BacktestSubmission, BacktestTask, JobKind};

use super::api_types::{StatusResponse, SubmitResponse};
use super::config::BacktestApiConfig;
use super::error::BacktestApiError;
use super::http_client::BacktestHttpClient;

/// Backtest service adapter over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpBacktestService {
    client: BacktestHttpClient,
    base_url: String,
}

impl HttpBacktestService {
    /// Create a new adapter.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BacktestApiConfig) -> Result<Self, BacktestApiError> {
        Ok(Self {
            client: BacktestHttpClient::new(config)?,
            base_url: config.base_url.clone(),
        })
    }

    /// Configured API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn submit_path(kind: JobKind) -> &'static str {
        match kind {
            JobKind::SinglePair => "/backtest/run",
            JobKind::MultiPair => "/backtest/multi-pair",
        }
    }

    fn results_path(kind: JobKind, task_id: &str) -> String {
        match kind {
            JobKind::SinglePair => format!("/backtest/{task_id}/results"),
            JobKind::MultiPair => format!("/backtest/multi-pair/{task_id}/results"),
        }
    }
}

#[async_trait]
impl BacktestService for HttpBacktestService {
    async fn health(&self) -> Result<HealthStatus, BacktestServiceError> {
        self.client
            .get("/health")
            .await
            .map_err(BacktestServiceError::from)
    }

    async fn info(&self) -> Result<ServiceInfo, BacktestServiceError> {
        self.client
            .get("/info")
            .await
            .map_err(BacktestServiceError::from)
    }

    async fn submit(
        &self,
        submission: &BacktestSubmission,
    ) -> Result<SubmitAck, BacktestServiceError> {
        let kind = submission.kind();
        let path = Self::submit_path(kind);

        tracing::info!(
            kind = %kind,
            pairs = submission.pair_count(),
            path,
            "Submitting backtest"
        );

        let response = match submission {
            BacktestSubmission::SinglePair(request) => {
                self.client.post::<SubmitResponse, _>(path, request).await
            }
            BacktestSubmission::MultiPair(request) => {
                self.client.post::<SubmitResponse, _>(path, request).await
            }
        }
        .map_err(BacktestServiceError::from)?;

        let ack = SubmitAck::try_from(response).map_err(BacktestServiceError::from)?;

        tracing::info!(
            task_id = %ack.task_id,
            status = %ack.status,
            "Backtest accepted"
        );

        Ok(ack)
    }

    async fn status(&self, task_id: &str) -> Result<BacktestTask, BacktestServiceError> {
        let response: StatusResponse = self
            .client
            .get(&format!("/backtest/{task_id}/status"))
            .await
            .map_err(BacktestServiceError::from)?;

        BacktestTask::try_from(response).map_err(BacktestServiceError::from)
    }

    async fn results(
        &self,
        kind: JobKind,
        task_id: &str,
    ) -> Result<serde_json::Value, BacktestServiceError> {
        self.client
            .get(&Self::results_path(kind, task_id))
            .await
            .map_err(BacktestServiceError::from)
    }

    async fn ohlc(
        &self,
        task_id: &str,
        resolution: OhlcResolution,
    ) -> Result<OhlcSeries, BacktestServiceError> {
        self.client
            .get(&format!("/backtest/{task_id}/{}", resolution.path_segment()))
            .await
            .map_err(BacktestServiceError::from)
    }
}
