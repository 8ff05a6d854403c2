//! Backtest service adapter error types.

use thiserror::Error;

use crate::application::ports::BacktestServiceError;

/// Errors from the HTTP backtest service adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BacktestApiError {
    /// Client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    /// Network error or timeout (retryable).
    #[error("Network error: {0}")]
    Network(String),

    /// Service returned an error status.
    #[error("API error: HTTP {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the service.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {resource}")]
    NotFound {
        /// Requested path.
        resource: String,
    },

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Max retries exceeded.
    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// Last failure observed.
        last_error: String,
    },
}

impl From<BacktestApiError> for BacktestServiceError {
    fn from(err: BacktestApiError) -> Self {
        match err {
            BacktestApiError::Client(message) | BacktestApiError::Network(message) => {
                Self::Connection { message }
            }
            BacktestApiError::Api { status, message } => Self::Http { status, message },
            BacktestApiError::NotFound { resource } => Self::NotFound { resource },
            BacktestApiError::JsonParse(message) => Self::Decode { message },
            BacktestApiError::MaxRetriesExceeded {
                attempts,
                last_error,
            } => Self::RetriesExhausted {
                attempts,
                message: last_error,
            },
        }
    }
}
