//! Review text normalization
//!
//! Cleaning is a single pass that is a fixed point: running the normalizer on
//! its own output returns the same string.

use crate::config::TextProcessingConfig;
use crate::stopwords::DEFAULT_STOPWORDS;
use regex::Regex;
use reviewreply_core::{Error, Result};
use std::collections::HashSet;

/// Accented letters kept alongside `a-z`
const FRENCH_LETTERS: &str = "àâäéèêëîïôöùûüç";

/// Tokens this short carry no sentiment and are always dropped
const MIN_TOKEN_CHARS: usize = 3;

/// Cleans raw review text before classification
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    url_regex: Regex,
    stopwords: HashSet<String>,
}

impl TextNormalizer {
    /// Create a normalizer with the built-in French stopwords
    pub fn new() -> Result<Self> {
        Self::with_stopwords(DEFAULT_STOPWORDS.iter().map(|w| w.to_string()))
    }

    /// Create a normalizer with a custom stopword set
    pub fn with_stopwords(stopwords: impl IntoIterator<Item = String>) -> Result<Self> {
        let url_regex = Regex::new(r"http\S+|www\S+|https\S+")
            .map_err(|e| Error::config(format!("Failed to compile URL regex: {e}")))?;

        Ok(Self {
            url_regex,
            stopwords: stopwords.into_iter().collect(),
        })
    }

    /// Create a normalizer from text processing configuration
    pub fn from_config(config: &TextProcessingConfig) -> Result<Self> {
        Self::with_stopwords(config.resolve_stopwords()?)
    }

    /// Clean review text.
    ///
    /// Never fails; empty or fully-stripped input yields an empty string.
    pub fn normalize(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();
        let trimmed = lowered.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let without_urls = self.url_regex.replace_all(trimmed, "");

        let filtered: String = without_urls
            .chars()
            .filter(|c| !is_emoji_or_symbol(*c) && !c.is_ascii_punctuation())
            .map(|c| if is_retained(c) { c } else { ' ' })
            .collect();

        filtered
            .split_whitespace()
            .filter(|token| self.keeps_token(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of configured stopwords
    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    fn keeps_token(&self, token: &str) -> bool {
        // Punctuation removal can glue URL fragments back together ("ht.tp")
        if token.contains("http") || token.contains("www") {
            return false;
        }

        token.chars().count() >= MIN_TOKEN_CHARS && !self.stopwords.contains(token)
    }
}

/// Emoji, pictographs, dingbats and the joiners/selectors that glue them.
pub fn is_emoji_or_symbol(c: char) -> bool {
    matches!(
        c,
        '\u{1F600}'..='\u{1F64F}'
            | '\u{1F300}'..='\u{1F5FF}'
            | '\u{1F680}'..='\u{1F6FF}'
            | '\u{1F1E0}'..='\u{1F1FF}'
            | '\u{2700}'..='\u{27BF}'
            | '\u{1F926}'..='\u{1F937}'
            | '\u{10000}'..='\u{10FFFF}'
            | '\u{2640}'..='\u{2642}'
            | '\u{2600}'..='\u{2B55}'
            | '\u{200D}'
            | '\u{23CF}'
            | '\u{23E9}'
            | '\u{231A}'
            | '\u{FE0F}'
            | '\u{3030}'
    )
}

fn is_retained(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || FRENCH_LETTERS.contains(c)
}
