//! Review pipeline orchestration: clean, classify, reply

use crate::config::ServiceConfig;
use reviewreply_classifiers::ReviewProcessor;
use reviewreply_core::{Confidence, Error, Result, Review, ReviewAnalysis};
use reviewreply_responder::{GenerationOutcome, ResponseSelector, ResponseTemplateSet, TextGenerator};
use reviewreply_telemetry::MetricsCollector;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Runs a review through normalization, classification and reply selection
pub struct ReviewPipeline {
    processor: ReviewProcessor,
    selector: ResponseSelector,
    metrics: MetricsCollector,
}

impl ReviewPipeline {
    pub fn new(processor: ReviewProcessor, selector: ResponseSelector, metrics: MetricsCollector) -> Self {
        Self {
            processor,
            selector,
            metrics,
        }
    }

    /// Build the pipeline from configuration with an optional loaded model
    pub fn from_config(
        config: &ServiceConfig,
        generator: Option<Arc<dyn TextGenerator>>,
        metrics: MetricsCollector,
    ) -> Result<Self> {
        let processor = ReviewProcessor::from_config(&config.text)?;
        let templates = ResponseTemplateSet::from_config(&config.templates)?;
        let selector = ResponseSelector::new(templates).with_generator(generator, config.generation.clone());

        Ok(Self::new(processor, selector, metrics))
    }

    pub fn processor(&self) -> &ReviewProcessor {
        &self.processor
    }

    pub fn selector(&self) -> &ResponseSelector {
        &self.selector
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Analyse a validated review. Blocks while a generative model runs.
    pub fn handle_review(&self, review: &Review) -> ReviewAnalysis {
        let start = Instant::now();

        let processed = self.processor.process(review);
        let selected = self
            .selector
            .select_response(&processed.cleaned_text, processed.sentiment);
        let confidence = Confidence::assess(&processed);

        let latency_us = start.elapsed().as_micros() as u64;
        self.metrics.record_request();
        self.metrics.record_sentiment(processed.sentiment);
        if matches!(selected.outcome, GenerationOutcome::ModelFailed(_)) {
            self.metrics.record_model_fallback();
        }
        self.metrics.record_response(selected.source);
        self.metrics.record_latency(latency_us);

        debug!(
            sentiment = %processed.sentiment,
            confidence = %confidence,
            source = selected.source.as_str(),
            latency_us,
            "Review analysed"
        );

        ReviewAnalysis {
            sentiment: processed.sentiment,
            response: selected.text,
            cleaned_text: processed.cleaned_text,
            confidence,
            source: selected.source,
        }
    }

    /// Analyse a review on the blocking thread pool.
    ///
    /// A panic inside the pipeline surfaces as [`Error::Internal`] with no
    /// partial result.
    pub async fn analyse(self: &Arc<Self>, review: Review) -> Result<ReviewAnalysis> {
        let pipeline = Arc::clone(self);

        tokio::task::spawn_blocking(move || pipeline.handle_review(&review))
            .await
            .map_err(|e| {
                error!(error = %e, "Review pipeline task failed");
                Error::internal("review pipeline task failed")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewreply_core::{Rating, ResponseSource, SentimentLabel};

    fn pipeline() -> ReviewPipeline {
        ReviewPipeline::from_config(&ServiceConfig::default(), None, MetricsCollector::new()).unwrap()
    }

    #[test]
    fn test_handle_review_positive_text() {
        let pipeline = pipeline();
        let review = Review::new("Produit fantastique! 😊 http://t.co", None).unwrap();
        let analysis = pipeline.handle_review(&review);

        assert_eq!(analysis.sentiment, SentimentLabel::Positive);
        assert_eq!(analysis.cleaned_text, "produit fantastique");
        assert_eq!(analysis.confidence, Confidence::High);
        assert_eq!(analysis.source, ResponseSource::Template);
        assert!(pipeline
            .selector()
            .templates()
            .contains(SentimentLabel::Positive, &analysis.response));
    }

    #[test]
    fn test_confidence_levels() {
        let pipeline = pipeline();

        let rated = Review::new("Bof", Some(Rating::new(3).unwrap())).unwrap();
        assert_eq!(pipeline.handle_review(&rated).confidence, Confidence::VeryHigh);

        let short = Review::new("Top!", None).unwrap();
        assert_eq!(pipeline.handle_review(&short).confidence, Confidence::Low);
    }

    #[test]
    fn test_metrics_recorded() {
        let pipeline = pipeline();
        let review = Review::new("Horrible, catastrophique et nul", None).unwrap();
        pipeline.handle_review(&review);

        let snapshot = pipeline.metrics().snapshot();
        assert_eq!(snapshot.total_requests, 1);
        assert_eq!(snapshot.negative, 1);
        assert_eq!(snapshot.template_responses, 1);
    }

    #[tokio::test]
    async fn test_analyse_runs_on_blocking_pool() {
        let pipeline = Arc::new(pipeline());
        let review = Review::new("Service rapide et efficace", Some(Rating::new(1).unwrap())).unwrap();
        let analysis = pipeline.analyse(review).await.unwrap();

        assert_eq!(analysis.sentiment, SentimentLabel::Negative);
        assert_eq!(analysis.confidence, Confidence::VeryHigh);
    }
}
