//! Backtest service wire types.
//!
//! These mirror the service's JSON and are converted into domain types at the
//! adapter boundary.

use std::time::Duration;

use chrono::NaiveDateTime;
use reqwest::StatusCode;
use serde::Deserialize;

use super::error::BacktestApiError;
use crate::application::ports::SubmitAck;
use crate::domain::{BacktestTask, TaskStatus};

/// Parse a wire status string.
fn parse_status(raw: &str) -> Result<TaskStatus, BacktestApiError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "queued" | "pending" => Ok(TaskStatus::Queued),
        "running" => Ok(TaskStatus::Running),
        "complete" | "completed" => Ok(TaskStatus::Complete),
        "failed" | "error" => Ok(TaskStatus::Failed),
        other => Err(BacktestApiError::JsonParse(format!(
            "unknown task status: {other}"
        ))),
    }
}

/// `POST /backtest/run` and `POST /backtest/multi-pair` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    /// Server-assigned task id.
    pub task_id: String,
    /// Initial status.
    pub status: String,
}

impl TryFrom<SubmitResponse> for SubmitAck {
    type Error = BacktestApiError;

    fn try_from(resp: SubmitResponse) -> Result<Self, Self::Error> {
        if resp.task_id.trim().is_empty() {
            return Err(BacktestApiError::JsonParse(
                "submission response has an empty task_id".to_string(),
            ));
        }
        Ok(Self {
            task_id: resp.task_id,
            status: parse_status(&resp.status)?,
        })
    }
}

/// `GET /backtest/{id}/status` response.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    /// Task id.
    pub task_id: String,
    /// Status string.
    pub status: String,
    /// Completion percentage.
    #[serde(default)]
    pub progress: Option<f64>,
    /// Status message.
    #[serde(default)]
    pub message: Option<String>,
    /// Estimated seconds remaining.
    #[serde(default)]
    pub eta_seconds: Option<f64>,
    /// Start time.
    #[serde(default, deserialize_with = "crate::domain::time::deserialize_lenient")]
    pub started_at: Option<NaiveDateTime>,
    /// Completion time.
    #[serde(default, deserialize_with = "crate::domain::time::deserialize_lenient")]
    pub completed_at: Option<NaiveDateTime>,
}

impl TryFrom<StatusResponse> for BacktestTask {
    type Error = BacktestApiError;

    fn try_from(resp: StatusResponse) -> Result<Self, Self::Error> {
        let progress = resp
            .progress
            .filter(|p| p.is_finite())
            .unwrap_or_default()
            .clamp(0.0, 100.0);
        let eta = resp
            .eta_seconds
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(Duration::from_secs_f64);

        Ok(Self {
            task_id: resp.task_id,
            status: parse_status(&resp.status)?,
            progress,
            message: resp.message.unwrap_or_default(),
            eta,
            started_at: resp.started_at,
            completed_at: resp.completed_at,
        })
    }
}

/// Error body. The service answers `{"detail": ...}`; some proxies use
/// `message` or `error`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorResponse {
    /// String or validation-error list.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    /// Plain message.
    #[serde(default)]
    pub message: Option<String>,
    /// Plain error.
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorResponse {
    /// Best human-readable message for an error response body.
    #[must_use]
    pub fn message_from(status: StatusCode, body: &str) -> String {
        let parsed = serde_json::from_str::<Self>(body).unwrap_or_default();

        let detail = parsed.detail.and_then(|d| match d {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        });

        detail
            .or(parsed.message)
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty())
            .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("queued", TaskStatus::Queued)]
    #[test_case("RUNNING", TaskStatus::Running)]
    #[test_case("complete", TaskStatus::Complete)]
    #[test_case("completed", TaskStatus::Complete)]
    #[test_case(" failed ", TaskStatus::Failed)]
    fn status_strings_parse(raw: &str, expected: TaskStatus) {
        assert_eq!(parse_status(raw).unwrap(), expected);
    }

    #[test]
    fn unknown_status_is_a_decode_error() {
        assert!(matches!(
            parse_status("exploded"),
            Err(BacktestApiError::JsonParse(_))
        ));
    }

    #[test]
    fn status_response_converts_and_clamps() {
        let resp: StatusResponse = serde_json::from_str(
            r#"{"task_id":"t-1","status":"running","progress":140.0,"message":"Simulating",
                "eta_seconds":12,"started_at":"2024-01-15T10:00:00","completed_at":null}"#,
        )
        .unwrap();

        let task = BacktestTask::try_from(resp).unwrap();
        assert_eq!(task.status, TaskStatus::Running);
        assert!((task.progress - 100.0).abs() < f64::EPSILON);
        assert_eq!(task.eta, Some(Duration::from_secs(12)));
        assert!(task.started_at.is_some());
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn status_response_tolerates_missing_fields() {
        let resp: StatusResponse =
            serde_json::from_str(r#"{"task_id":"t-1","status":"queued"}"#).unwrap();
        let task = BacktestTask::try_from(resp).unwrap();
        assert!(task.progress.abs() < f64::EPSILON);
        assert!(task.message.is_empty());
        assert!(task.eta.is_none());
    }

    #[test]
    fn negative_progress_clamps_to_zero() {
        let resp: StatusResponse =
            serde_json::from_str(r#"{"task_id":"t","status":"running","progress":-5}"#).unwrap();
        let task = BacktestTask::try_from(resp).unwrap();
        assert!(task.progress.abs() < f64::EPSILON);
    }

    #[test]
    fn submit_response_requires_task_id() {
        let resp = SubmitResponse {
            task_id: " ".to_string(),
            status: "queued".to_string(),
        };
        assert!(SubmitAck::try_from(resp).is_err());
    }

    #[test_case(r#"{"detail":"Symbol not supported"}"#, "Symbol not supported" ; "detail string")]
    #[test_case(r#"{"message":"bad request"}"#, "bad request" ; "message field")]
    #[test_case("upstream down", "upstream down" ; "plain text")]
    #[test_case("", "Bad Request" ; "empty body")]
    fn error_message_extraction(body: &str, expected: &str) {
        assert_eq!(
            ApiErrorResponse::message_from(StatusCode::BAD_REQUEST, body),
            expected
        );
    }

    #[test]
    fn validation_detail_list_is_stringified() {
        let msg = ApiErrorResponse::message_from(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","symbol"],"msg":"field required"}]}"#,
        );
        assert!(msg.contains("field required"));
    }
}
