//! Configuration for text cleaning and rating classification

use crate::stopwords::DEFAULT_STOPWORDS;
use reviewreply_core::{Error, Rating, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Text processing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextProcessingConfig {
    /// Inline stopword list, replaces the built-in French list
    #[serde(default)]
    pub stopwords: Option<Vec<String>>,

    /// File with one stopword per line, takes precedence over `stopwords`
    #[serde(default)]
    pub stopwords_file: Option<PathBuf>,

    /// Rating to sentiment thresholds
    #[serde(default)]
    pub rating: RatingThresholds,
}

impl TextProcessingConfig {
    /// Resolve the effective stopword set.
    ///
    /// Entries are lowercased and trimmed; blank lines and `#` comments in a
    /// stopword file are skipped.
    pub fn resolve_stopwords(&self) -> Result<HashSet<String>> {
        if let Some(path) = &self.stopwords_file {
            let content = std::fs::read_to_string(path).map_err(|e| {
                Error::config(format!(
                    "Failed to read stopwords file {}: {e}",
                    path.display()
                ))
            })?;

            let words = normalize_words(
                content
                    .lines()
                    .filter(|line| !line.trim_start().starts_with('#')),
            );
            tracing::debug!(count = words.len(), path = %path.display(), "Loaded stopwords file");
            return Ok(words);
        }

        if let Some(words) = &self.stopwords {
            return Ok(normalize_words(words.iter().map(String::as_str)));
        }

        Ok(normalize_words(DEFAULT_STOPWORDS.iter().copied()))
    }
}

fn normalize_words<'a>(words: impl Iterator<Item = &'a str>) -> HashSet<String> {
    words
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Thresholds mapping a 1-5 star rating to a sentiment.
///
/// `rating >= positive_min` is positive, `rating < negative_below` is
/// negative, anything in between is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingThresholds {
    #[serde(default = "default_positive_min")]
    pub positive_min: u8,

    #[serde(default = "default_negative_below")]
    pub negative_below: u8,
}

impl RatingThresholds {
    /// Thresholds used by the review API: 4-5 positive, 1 negative, 2-3 neutral
    pub const CANONICAL: Self = Self {
        positive_min: 4,
        negative_below: 2,
    };

    pub fn validate(&self) -> Result<()> {
        let in_range = |v: u8| (Rating::MIN..=Rating::MAX).contains(&v);

        if !in_range(self.positive_min) {
            return Err(Error::config(format!(
                "rating.positive_min must be within {}..={}, got {}",
                Rating::MIN,
                Rating::MAX,
                self.positive_min
            )));
        }

        if self.negative_below < Rating::MIN || self.negative_below > self.positive_min {
            return Err(Error::config(format!(
                "rating.negative_below must be within {}..={}, got {}",
                Rating::MIN,
                self.positive_min,
                self.negative_below
            )));
        }

        Ok(())
    }

    pub fn is_canonical(&self) -> bool {
        *self == Self::CANONICAL
    }
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self::CANONICAL
    }
}

fn default_positive_min() -> u8 {
    RatingThresholds::CANONICAL.positive_min
}

fn default_negative_below() -> u8 {
    RatingThresholds::CANONICAL.negative_below
}
