//! ReviewReply Classifiers
//!
//! Text cleaning and sentiment classification for customer reviews.
//!
//! Processing is deterministic:
//! - [`TextNormalizer`] lowercases and strips URLs, emoji, punctuation and stopwords
//! - [`SentimentClassifier`] maps a star rating or the cleaned text to a label
//! - [`ReviewProcessor`] chains both into a [`ProcessedReview`](reviewreply_core::ProcessedReview)

pub mod config;
pub mod normalizer;
pub mod processor;
pub mod sentiment;
pub mod stopwords;

pub use config::{RatingThresholds, TextProcessingConfig};
pub use normalizer::TextNormalizer;
pub use processor::ReviewProcessor;
pub use sentiment::{KeywordHits, SentimentClassifier};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::normalizer::TextNormalizer;
    pub use crate::processor::ReviewProcessor;
    pub use crate::sentiment::SentimentClassifier;
}
