//! HTTP client wrapper with retry logic.

use std::time::Duration;

use rand::Rng;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::ApiErrorResponse;
use super::config::{BacktestApiConfig, RetryConfig};
use super::error::BacktestApiError;

/// HTTP client for the backtest service.
///
/// GET requests are retried on network errors and transient statuses. POST
/// requests are sent exactly once: a resubmitted backtest would start a second
/// job on the server.
#[derive(Debug, Clone)]
pub struct BacktestHttpClient {
    client: Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl BacktestHttpClient {
    /// Create a new HTTP client from config.
    ///
    /// # Errors
    ///
    /// Returns [`BacktestApiError::Client`] if the underlying client cannot
    /// be built.
    pub fn new(config: &BacktestApiConfig) -> Result<Self, BacktestApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BacktestApiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            retry_config: config.retry.clone(),
        })
    }

    /// Make a GET request, retrying transient failures.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BacktestApiError> {
        self.request(Method::GET, path, None::<&()>, &self.retry_config)
            .await
    }

    /// Make a POST request. Never retried.
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BacktestApiError> {
        let single_attempt = RetryConfig {
            max_attempts: 1,
            ..self.retry_config.clone()
        };
        self.request(Method::POST, path, Some(body), &single_attempt)
            .await
    }

    async fn request<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        retry: &RetryConfig,
    ) -> Result<T, BacktestApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut backoff = ExponentialBackoff::new(retry);

        loop {
            let mut request = self.client.request(method.clone(), &url);
            if let Some(b) = body {
                request = request.json(b);
            }

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    let reason = if e.is_timeout() {
                        format!("request to {path} timed out")
                    } else {
                        e.to_string()
                    };
                    if let Some(delay) = backoff.next_backoff() {
                        let delay = jittered(delay);
                        tracing::warn!(
                            error = %reason,
                            path,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "Network error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(exhausted(&backoff, BacktestApiError::Network(reason)));
                }
            };

            let status = response.status();

            if status.is_success() {
                let text = response
                    .text()
                    .await
                    .map_err(|e| BacktestApiError::Network(e.to_string()))?;
                return serde_json::from_str(&text)
                    .map_err(|e| BacktestApiError::JsonParse(format!("{path}: {e}")));
            }

            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());

            let error_body = response.text().await.unwrap_or_default();
            let error_message = ApiErrorResponse::message_from(status, &error_body);

            match categorize_status(status) {
                category @ (ErrorCategory::RateLimited | ErrorCategory::Retryable) => {
                    let delay = backoff.next_backoff().map(|d| match category {
                        ErrorCategory::RateLimited => retry_after.map_or(d, Duration::from_secs),
                        _ => jittered(d),
                    });
                    if let Some(delay) = delay {
                        tracing::warn!(
                            status = status.as_u16(),
                            message = %error_message,
                            path,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "Retryable error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(exhausted(
                        &backoff,
                        BacktestApiError::Api {
                            status: status.as_u16(),
                            message: error_message,
                        },
                    ));
                }
                ErrorCategory::NonRetryable => {
                    return match status {
                        StatusCode::NOT_FOUND => Err(BacktestApiError::NotFound {
                            resource: path.to_string(),
                        }),
                        _ => Err(BacktestApiError::Api {
                            status: status.as_u16(),
                            message: error_message,
                        }),
                    };
                }
            }
        }
    }
}

/// Final error once the attempt budget is spent. A single-attempt request
/// surfaces its own failure unwrapped.
fn exhausted(backoff: &ExponentialBackoff, last: BacktestApiError) -> BacktestApiError {
    if backoff.max_attempts <= 1 {
        return last;
    }
    BacktestApiError::MaxRetriesExceeded {
        attempts: backoff.attempt,
        last_error: last.to_string(),
    }
}

/// Spread a delay over `[delay / 2, delay]`.
fn jittered(delay: Duration) -> Duration {
    let ceiling = delay.as_secs_f64();
    if ceiling <= 0.0 {
        return delay;
    }
    Duration::from_secs_f64(rand::rng().random_range(ceiling / 2.0..=ceiling))
}

/// Error category for determining retry behavior.
enum ErrorCategory {
    RateLimited,
    Retryable,
    NonRetryable,
}

/// Categorize HTTP status code for retry handling.
const fn categorize_status(status: StatusCode) -> ErrorCategory {
    match status.as_u16() {
        429 => ErrorCategory::RateLimited,
        408 | 500 | 502 | 503 | 504 => ErrorCategory::Retryable,
        _ => ErrorCategory::NonRetryable,
    }
}

/// Exponential backoff calculator.
struct ExponentialBackoff {
    attempt: u32,
    max_attempts: u32,
    current_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

impl ExponentialBackoff {
    const fn new(config: &RetryConfig) -> Self {
        Self {
            attempt: 0,
            max_attempts: config.max_attempts,
            current_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
        }
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }

        let backoff = self.current_backoff;
        self.current_backoff = Duration::from_secs_f64(
            (self.current_backoff.as_secs_f64() * self.multiplier)
                .min(self.max_backoff.as_secs_f64()),
        );

        Some(backoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorize_rate_limited() {
        assert!(matches!(
            categorize_status(StatusCode::TOO_MANY_REQUESTS),
            ErrorCategory::RateLimited
        ));
    }

    #[test]
    fn categorize_retryable() {
        for status in [
            StatusCode::REQUEST_TIMEOUT,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::GATEWAY_TIMEOUT,
        ] {
            assert!(matches!(categorize_status(status), ErrorCategory::Retryable));
        }
    }

    #[test]
    fn categorize_non_retryable() {
        for status in [
            StatusCode::BAD_REQUEST,
            StatusCode::NOT_FOUND,
            StatusCode::UNPROCESSABLE_ENTITY,
        ] {
            assert!(matches!(
                categorize_status(status),
                ErrorCategory::NonRetryable
            ));
        }
    }

    #[test]
    fn exponential_backoff_increments() {
        let config = RetryConfig {
            max_attempts: 4,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        };

        let mut backoff = ExponentialBackoff::new(&config);

        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(400)));
        assert!(backoff.next_backoff().is_none());
    }

    #[test]
    fn exponential_backoff_respects_max() {
        let config = RetryConfig {
            max_attempts: 10,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(5),
            multiplier: 10.0,
        };

        let mut backoff = ExponentialBackoff::new(&config);

        backoff.next_backoff();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn single_attempt_never_backs_off() {
        let config = RetryConfig {
            max_attempts: 1,
            ..RetryConfig::default()
        };
        let mut backoff = ExponentialBackoff::new(&config);
        assert!(backoff.next_backoff().is_none());
    }

    #[test]
    fn jitter_stays_within_half_to_full_delay() {
        let delay = Duration::from_millis(400);
        for _ in 0..100 {
            let j = jittered(delay);
            assert!(j >= Duration::from_millis(200));
            assert!(j <= delay);
        }
        assert_eq!(jittered(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn single_attempt_failure_is_not_wrapped() {
        let config = RetryConfig {
            max_attempts: 1,
            ..RetryConfig::default()
        };
        let mut backoff = ExponentialBackoff::new(&config);
        backoff.next_backoff();
        let err = exhausted(&backoff, BacktestApiError::Network("refused".to_string()));
        assert_eq!(err, BacktestApiError::Network("refused".to_string()));
    }
}
