//! Observability: structured logging and Prometheus metrics.

mod logging;
pub mod metrics;

pub use logging::{env_filter, init_logging};
pub use self::metrics::{MetricsConfig, MetricsError, init_metrics};
