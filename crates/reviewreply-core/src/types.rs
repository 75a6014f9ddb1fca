//! Core types for ReviewReply

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum accepted review length, in characters
pub const MAX_REVIEW_CHARS: usize = 2000;

/// Cleaned text shorter than this (in characters) lowers the confidence
const SHORT_TEXT_CHARS: usize = 10;

/// Sentiment assigned to a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// All labels, in a stable order
    pub const ALL: [SentimentLabel; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = Error;

    /// Accepts the English labels and their French equivalents.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "positif" => Ok(Self::Positive),
            "negative" | "negatif" | "négatif" => Ok(Self::Negative),
            "neutral" | "neutre" => Ok(Self::Neutral),
            other => Err(Error::invalid_input(format!(
                "unknown sentiment label: {other}"
            ))),
        }
    }
}

/// Star rating between 1 and 5 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Create a rating, rejecting values outside 1..=5
    pub fn new(value: i64) -> Result<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(Error::invalid_input(format!(
                "rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer review as received from a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    text: String,
    rating: Option<Rating>,
}

impl Review {
    /// Validate and build a review.
    ///
    /// The text must hold between 1 and [`MAX_REVIEW_CHARS`] characters.
    /// Whitespace counts; a blank review cleans to an empty string.
    pub fn new(text: impl Into<String>, rating: Option<Rating>) -> Result<Self> {
        let text = text.into();

        if text.is_empty() {
            return Err(Error::invalid_input("review text must not be empty"));
        }

        let chars = text.chars().count();
        if chars > MAX_REVIEW_CHARS {
            return Err(Error::invalid_input(format!(
                "review text must be at most {MAX_REVIEW_CHARS} characters, got {chars}"
            )));
        }

        Ok(Self { text, rating })
    }

    /// Build a review from an unvalidated numeric rating
    pub fn with_raw_rating(text: impl Into<String>, rating: Option<i64>) -> Result<Self> {
        let rating = rating.map(Rating::new).transpose()?;
        Self::new(text, rating)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }
}

/// A review after cleaning and classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedReview {
    pub original_text: String,
    pub cleaned_text: String,
    pub sentiment: SentimentLabel,
    pub rating: Option<Rating>,
}

/// How much the caller should trust the sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

impl Confidence {
    /// An explicit rating is the strongest signal; very short cleaned text the weakest.
    pub fn assess(processed: &ProcessedReview) -> Self {
        if processed.rating.is_some() {
            Self::VeryHigh
        } else if processed.cleaned_text.chars().count() < SHORT_TEXT_CHARS {
            Self::Low
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    /// One of the canned templates
    Template,
    /// The generative model
    Model,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Model => "model",
        }
    }
}

/// Result of the full review pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewAnalysis {
    pub sentiment: SentimentLabel,
    pub response: String,
    pub cleaned_text: String,
    pub confidence: Confidence,

    /// Not part of the wire format; used for metrics and logging
    #[serde(skip)]
    pub source: ResponseSource,
}
