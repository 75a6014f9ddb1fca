//! Metrics collection and reporting

use reviewreply_core::{ResponseSource, SentimentLabel};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const REQUESTS_TOTAL: &str = "reviewreply_requests_total";
pub const RESPONSES_TOTAL: &str = "reviewreply_responses_total";
pub const SENTIMENT_TOTAL: &str = "reviewreply_sentiment_total";
pub const ERRORS_TOTAL: &str = "reviewreply_errors_total";
pub const MODEL_FALLBACKS_TOTAL: &str = "reviewreply_model_fallbacks_total";
pub const PIPELINE_LATENCY_US: &str = "reviewreply_pipeline_latency_us";

/// Register metric descriptions with the installed recorder
pub fn describe_metrics() {
    metrics::describe_counter!(REQUESTS_TOTAL, "Total number of analysed reviews");
    metrics::describe_counter!(RESPONSES_TOTAL, "Replies sent, by source (template or model)");
    metrics::describe_counter!(SENTIMENT_TOTAL, "Reviews classified, by sentiment label");
    metrics::describe_counter!(ERRORS_TOTAL, "Failed or rejected requests, by error kind");
    metrics::describe_counter!(
        MODEL_FALLBACKS_TOTAL,
        "Generative replies rejected or failed and replaced by a template"
    );
    metrics::describe_histogram!(
        PIPELINE_LATENCY_US,
        metrics::Unit::Microseconds,
        "Review pipeline latency in microseconds"
    );
}

/// Metrics collector for review processing
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    total_requests: AtomicU64,
    positive: AtomicU64,
    negative: AtomicU64,
    neutral: AtomicU64,
    template_responses: AtomicU64,
    model_responses: AtomicU64,
    model_fallbacks: AtomicU64,
    errors: AtomicU64,
    total_latency_us: AtomicU64,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    /// Record an analysed review
    pub fn record_request(&self) {
        self.inner.total_requests.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(REQUESTS_TOTAL).increment(1);
    }

    pub fn record_sentiment(&self, label: SentimentLabel) {
        let counter = match label {
            SentimentLabel::Positive => &self.inner.positive,
            SentimentLabel::Negative => &self.inner.negative,
            SentimentLabel::Neutral => &self.inner.neutral,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(SENTIMENT_TOTAL, "label" => label.as_str()).increment(1);
    }

    pub fn record_response(&self, source: ResponseSource) {
        let counter = match source {
            ResponseSource::Template => &self.inner.template_responses,
            ResponseSource::Model => &self.inner.model_responses,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(RESPONSES_TOTAL, "source" => source.as_str()).increment(1);
    }

    /// Record a model reply replaced by a template
    pub fn record_model_fallback(&self) {
        self.inner.model_fallbacks.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(MODEL_FALLBACKS_TOTAL).increment(1);
    }

    /// Record a failed request; `kind` is the error kind label
    pub fn record_error(&self, kind: &'static str) {
        self.inner.errors.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(ERRORS_TOTAL, "kind" => kind).increment(1);
    }

    /// Record pipeline latency
    pub fn record_latency(&self, latency_us: u64) {
        self.inner
            .total_latency_us
            .fetch_add(latency_us, Ordering::Relaxed);
        metrics::histogram!(PIPELINE_LATENCY_US).record(latency_us as f64);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);

        MetricsSnapshot {
            total_requests: load(&self.inner.total_requests),
            positive: load(&self.inner.positive),
            negative: load(&self.inner.negative),
            neutral: load(&self.inner.neutral),
            template_responses: load(&self.inner.template_responses),
            model_responses: load(&self.inner.model_responses),
            model_fallbacks: load(&self.inner.model_fallbacks),
            errors: load(&self.inner.errors),
            total_latency_us: load(&self.inner.total_latency_us),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    pub template_responses: u64,
    pub model_responses: u64,
    pub model_fallbacks: u64,
    pub errors: u64,
    pub total_latency_us: u64,
}

impl MetricsSnapshot {
    /// Calculate average latency per request
    pub fn avg_latency_us(&self) -> u64 {
        if self.total_requests == 0 {
            0
        } else {
            self.total_latency_us / self.total_requests
        }
    }

    /// Share of replies produced by the generative model
    pub fn model_response_rate(&self) -> f64 {
        let replies = self.template_responses + self.model_responses;
        if replies == 0 {
            0.0
        } else {
            self.model_responses as f64 / replies as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let metrics = MetricsCollector::new();

        metrics.record_request();
        metrics.record_sentiment(SentimentLabel::Positive);
        metrics.record_response(ResponseSource::Template);
        metrics.record_latency(5000);

        metrics.record_request();
        metrics.record_sentiment(SentimentLabel::Negative);
        metrics.record_model_fallback();
        metrics.record_response(ResponseSource::Template);
        metrics.record_latency(3000);

        metrics.record_error("invalid_input");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert_eq!(snapshot.positive, 1);
        assert_eq!(snapshot.negative, 1);
        assert_eq!(snapshot.neutral, 0);
        assert_eq!(snapshot.template_responses, 2);
        assert_eq!(snapshot.model_fallbacks, 1);
        assert_eq!(snapshot.errors, 1);
        assert_eq!(snapshot.avg_latency_us(), 4000);
        assert_eq!(snapshot.model_response_rate(), 0.0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = MetricsCollector::new();
        let clone = metrics.clone();
        clone.record_response(ResponseSource::Model);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.model_responses, 1);
        assert_eq!(snapshot.model_response_rate(), 1.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = MetricsCollector::new().snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["total_requests"], 0);
        assert_eq!(json["model_fallbacks"], 0);
    }
}
