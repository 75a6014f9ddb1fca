//! ReviewReply Core
//!
//! Core types and error handling shared across ReviewReply components.
//!
//! This crate provides:
//! - The review data model (`Review`, `Rating`, `ProcessedReview`)
//! - The sentiment and confidence labels returned to callers
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    Confidence, ProcessedReview, Rating, ResponseSource, Review, ReviewAnalysis, SentimentLabel,
    MAX_REVIEW_CHARS,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        Confidence, ProcessedReview, Rating, Review, ReviewAnalysis, SentimentLabel,
    };
}
