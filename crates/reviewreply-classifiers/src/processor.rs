//! Clean-then-classify review processing

use crate::config::TextProcessingConfig;
use crate::normalizer::TextNormalizer;
use crate::sentiment::SentimentClassifier;
use reviewreply_core::{ProcessedReview, Result, Review};

/// Normalizes a review and assigns its sentiment
pub struct ReviewProcessor {
    normalizer: TextNormalizer,
    classifier: SentimentClassifier,
}

impl ReviewProcessor {
    pub fn new(normalizer: TextNormalizer, classifier: SentimentClassifier) -> Self {
        Self {
            normalizer,
            classifier,
        }
    }

    /// Build a processor from text processing configuration
    pub fn from_config(config: &TextProcessingConfig) -> Result<Self> {
        if !config.rating.is_canonical() {
            tracing::warn!(
                positive_min = config.rating.positive_min,
                negative_below = config.rating.negative_below,
                "Non-default rating thresholds configured; rated reviews may be labelled differently than by the API defaults (4-5 positive, 1 negative)"
            );
        }

        Ok(Self::new(
            TextNormalizer::from_config(config)?,
            SentimentClassifier::with_thresholds(config.rating)?,
        ))
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    /// Clean the review text, then classify by rating if present, by text otherwise
    pub fn process(&self, review: &Review) -> ProcessedReview {
        let cleaned_text = self.normalizer.normalize(review.text());
        let sentiment = self.classifier.classify(&cleaned_text, review.rating());

        tracing::debug!(
            sentiment = %sentiment,
            rated = review.rating().is_some(),
            cleaned_chars = cleaned_text.chars().count(),
            "Review processed"
        );

        ProcessedReview {
            original_text: review.text().to_string(),
            cleaned_text,
            sentiment,
            rating: review.rating(),
        }
    }
}
