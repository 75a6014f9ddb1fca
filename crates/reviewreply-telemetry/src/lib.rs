//! ReviewReply Telemetry
//!
//! In-process counters backing the `/stats` endpoint, mirrored to the
//! `metrics` facade for Prometheus export.

pub mod metrics;

pub use metrics::{describe_metrics, MetricsCollector, MetricsSnapshot};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::metrics::{MetricsCollector, MetricsSnapshot};
}
