//! Keyword and rating based sentiment classifier
//!
//! Text classification counts how many distinct lexicon entries occur as
//! substrings of the lowercased text. A star rating, when present, always wins.

use crate::config::RatingThresholds;
use aho_corasick::AhoCorasick;
use reviewreply_core::{Error, Rating, Result, SentimentLabel};

/// Positive French review vocabulary (plus a couple of common anglicisms)
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "excellent",
    "fantastique",
    "parfait",
    "super",
    "génial",
    "formidable",
    "merveilleux",
    "incroyable",
    "magnifique",
    "extraordinaire",
    "remarquable",
    "satisfait",
    "content",
    "heureux",
    "ravi",
    "enchanté",
    "impressionné",
    "recommande",
    "qualité",
    "rapide",
    "efficace",
    "professionnel",
    "top",
    "bon",
    "bien",
    "mieux",
    "meilleur",
    "love",
    "adore",
];

/// Negative French review vocabulary
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "mauvais",
    "terrible",
    "horrible",
    "nul",
    "catastrophique",
    "décevant",
    "insatisfait",
    "mécontent",
    "frustré",
    "énervé",
    "fâché",
    "déçu",
    "problème",
    "erreur",
    "défaut",
    "cassé",
    "abîmé",
    "retard",
    "lent",
    "cher",
    "arnaque",
    "vol",
    "scandale",
    "inadmissible",
    "inacceptable",
    "pire",
    "déteste",
    "horreur",
    "cauchemar",
    "regret",
];

/// Number of distinct positive and negative keywords found in a text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordHits {
    pub positive: usize,
    pub negative: usize,
}

impl KeywordHits {
    /// Majority vote; ties (including no hits at all) are neutral.
    pub fn label(&self) -> SentimentLabel {
        if self.positive > self.negative && self.positive > 0 {
            SentimentLabel::Positive
        } else if self.negative > self.positive && self.negative > 0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Lexicon-based sentiment classifier with a rating shortcut
pub struct SentimentClassifier {
    positive: AhoCorasick,
    negative: AhoCorasick,
    thresholds: RatingThresholds,
}

impl SentimentClassifier {
    /// Create a classifier with the canonical rating thresholds
    pub fn new() -> Result<Self> {
        Self::with_thresholds(RatingThresholds::default())
    }

    pub fn with_thresholds(thresholds: RatingThresholds) -> Result<Self> {
        thresholds.validate()?;

        Ok(Self {
            positive: build_matcher(POSITIVE_KEYWORDS, "positive")?,
            negative: build_matcher(NEGATIVE_KEYWORDS, "negative")?,
            thresholds,
        })
    }

    pub fn thresholds(&self) -> RatingThresholds {
        self.thresholds
    }

    /// Count distinct keyword matches in `text`
    pub fn keyword_hits(&self, text: &str) -> KeywordHits {
        let lowered = text.to_lowercase();

        KeywordHits {
            positive: count_distinct(&self.positive, &lowered),
            negative: count_distinct(&self.negative, &lowered),
        }
    }

    pub fn classify_by_text(&self, text: &str) -> SentimentLabel {
        self.keyword_hits(text).label()
    }

    pub fn classify_by_rating(&self, rating: Rating) -> SentimentLabel {
        let value = rating.get();

        if value >= self.thresholds.positive_min {
            SentimentLabel::Positive
        } else if value < self.thresholds.negative_below {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Rating-based classification when a rating is supplied, text otherwise
    pub fn classify(&self, cleaned_text: &str, rating: Option<Rating>) -> SentimentLabel {
        match rating {
            Some(rating) => self.classify_by_rating(rating),
            None => self.classify_by_text(cleaned_text),
        }
    }
}

fn build_matcher(keywords: &[&str], polarity: &str) -> Result<AhoCorasick> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(keywords)
        .map_err(|e| Error::config(format!("Failed to build {polarity} sentiment matcher: {e}")))
}

/// Overlapping search: a keyword nested inside another one ("lent" in
/// "excellent") counts as its own hit.
fn count_distinct(matcher: &AhoCorasick, text: &str) -> usize {
    let mut seen = vec![false; matcher.patterns_len()];
    for m in matcher.find_overlapping_iter(text) {
        seen[m.pattern().as_usize()] = true;
    }
    seen.into_iter().filter(|hit| *hit).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(v: i64) -> Rating {
        Rating::new(v).unwrap()
    }

    #[test]
    fn test_text_classification() {
        let classifier = SentimentClassifier::new().unwrap();

        assert_eq!(
            classifier.classify_by_text("excellent parfait satisfait"),
            SentimentLabel::Positive
        );
        assert_eq!(
            classifier.classify_by_text("horrible catastrophique nul"),
            SentimentLabel::Negative
        );
        assert_eq!(
            classifier.classify_by_text("le produit est arrivé"),
            SentimentLabel::Neutral
        );
        assert_eq!(classifier.classify_by_text(""), SentimentLabel::Neutral);
    }

    #[test]
    fn test_ties_are_neutral() {
        let classifier = SentimentClassifier::new().unwrap();
        let hits = classifier.keyword_hits("super mais nul");
        assert_eq!(hits, KeywordHits { positive: 1, negative: 1 });
        assert_eq!(hits.label(), SentimentLabel::Neutral);
    }

    #[test]
    fn test_nested_keywords_each_count() {
        let classifier = SentimentClassifier::new().unwrap();
        let hits = classifier.keyword_hits("excellent");
        assert_eq!(hits, KeywordHits { positive: 1, negative: 1 });
    }

    #[test]
    fn test_keywords_counted_once() {
        let classifier = SentimentClassifier::new().unwrap();
        let hits = classifier.keyword_hits("super super super nul");
        assert_eq!(hits, KeywordHits { positive: 1, negative: 1 });
    }

    #[test]
    fn test_substring_containment() {
        let classifier = SentimentClassifier::new().unwrap();
        // "recommande" inside "recommandez", "déçu" inside "déçue"
        assert_eq!(classifier.keyword_hits("recommandez").positive, 1);
        assert_eq!(classifier.keyword_hits("vraiment déçue").negative, 1);
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = SentimentClassifier::new().unwrap();
        assert_eq!(
            classifier.classify_by_text("GÉNIAL et FORMIDABLE"),
            SentimentLabel::Positive
        );
    }

    #[test]
    fn test_rating_classification() {
        let classifier = SentimentClassifier::new().unwrap();

        assert_eq!(classifier.classify_by_rating(rating(5)), SentimentLabel::Positive);
        assert_eq!(classifier.classify_by_rating(rating(4)), SentimentLabel::Positive);
        assert_eq!(classifier.classify_by_rating(rating(3)), SentimentLabel::Neutral);
        assert_eq!(classifier.classify_by_rating(rating(2)), SentimentLabel::Neutral);
        assert_eq!(classifier.classify_by_rating(rating(1)), SentimentLabel::Negative);
    }

    #[test]
    fn test_alternative_thresholds() {
        let classifier = SentimentClassifier::with_thresholds(RatingThresholds {
            positive_min: 3,
            negative_below: 2,
        })
        .unwrap();

        assert_eq!(classifier.classify_by_rating(rating(3)), SentimentLabel::Positive);
        assert_eq!(classifier.classify_by_rating(rating(2)), SentimentLabel::Neutral);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let result = SentimentClassifier::with_thresholds(RatingThresholds {
            positive_min: 2,
            negative_below: 3,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_rating_overrides_text() {
        let classifier = SentimentClassifier::new().unwrap();
        assert_eq!(
            classifier.classify("excellent parfait génial", Some(rating(1))),
            SentimentLabel::Negative
        );
        assert_eq!(
            classifier.classify("excellent parfait génial", None),
            SentimentLabel::Positive
        );
    }
}
