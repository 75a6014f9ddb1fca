//! Shared application state

use crate::config::ServiceConfig;
use crate::pipeline::ReviewPipeline;
use metrics_exporter_prometheus::PrometheusHandle;
use reviewreply_core::Result;
use reviewreply_responder::TextGenerator;
use reviewreply_telemetry::MetricsCollector;
use std::sync::Arc;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServiceConfig>,

    /// Review pipeline, read-only after startup
    pub pipeline: Arc<ReviewPipeline>,

    /// In-process counters for `/stats`
    pub metrics: MetricsCollector,

    /// Prometheus handle for rendering `/metrics`, absent when no recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state from configuration and an optional loaded model
    pub fn new(config: ServiceConfig, generator: Option<Arc<dyn TextGenerator>>) -> Result<Self> {
        let metrics = MetricsCollector::new();
        let pipeline = ReviewPipeline::from_config(&config, generator, metrics.clone())?;

        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            metrics,
            metrics_handle: None,
        })
    }

    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    /// `"ai"` when replies are attempted with a loaded model, `"fallback"` otherwise
    pub fn mode(&self) -> &'static str {
        if self.pipeline.selector().model_mode_active() {
            "ai"
        } else {
            "fallback"
        }
    }
}
