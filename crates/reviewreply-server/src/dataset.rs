//! Review dataset tooling
//!
//! Datasets are JSON arrays of [`DatasetReview`]. Training pairs pair the
//! prompt the generative model sees with a reference reply for the
//! rating-derived sentiment.

use reviewreply_classifiers::ReviewProcessor;
use reviewreply_core::{Rating, Result, Review, SentimentLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Separator between prompt and reply in the plain text training format
pub const END_OF_TEXT: &str = "<|endoftext|>";

/// One labelled review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetReview {
    pub review_text: String,
    pub rating: i64,
    #[serde(default = "default_source")]
    pub source: String,
}

/// A prompt/reply example for fine-tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPair {
    pub input: String,
    pub output: String,
    pub sentiment: SentimentLabel,
    pub rating: u8,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
    pub total_reviews: usize,
    pub by_rating: BTreeMap<i64, usize>,
    pub by_source: BTreeMap<String, usize>,
    pub avg_text_length: f64,
}

/// Keyword classifier accuracy against rating-derived labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub evaluated: usize,
    pub skipped: usize,
    pub correct: usize,
    /// Expected label -> predicted label -> count
    pub confusion: BTreeMap<SentimentLabel, BTreeMap<SentimentLabel, usize>>,
}

impl Evaluation {
    pub fn accuracy(&self) -> f64 {
        if self.evaluated == 0 {
            0.0
        } else {
            self.correct as f64 / self.evaluated as f64
        }
    }
}

fn default_source() -> String {
    "unknown".to_string()
}

const SYNTHETIC: &[(&str, i64)] = &[
    ("Produit absolument fantastique ! Très satisfait de mon achat, je le recommande vivement à tous.", 5),
    ("Excellente qualité, livraison rapide. Conforme à mes attentes, très bon rapport qualité-prix.", 5),
    ("Très bon produit, bien emballé. Service client réactif. Je recommande cette marque.", 4),
    ("Satisfait de cet achat. Produit solide et bien fini. Livraison dans les temps.", 4),
    ("Super produit ! Exactement ce que je cherchais. Merci pour la rapidité d'expédition.", 5),
    ("Bonne qualité, conforme à la description. Prix correct pour ce type de produit.", 4),
    ("Très déçu de cet achat. Qualité médiocre, ne correspond pas à la description.", 2),
    ("Produit défectueux dès la première utilisation. Service client non réactif. À éviter.", 1),
    ("Mauvaise qualité, matériaux cheap. Photos trompeuses sur le site. Déçu.", 1),
    ("Pas terrible du tout. Livraison en retard et produit abîmé. Demande de remboursement.", 2),
    ("N'achetez pas ce produit ! Arnaque totale, rien ne fonctionne comme annoncé.", 1),
    ("Qualité décevante pour le prix payé. Attention aux avis bidons, ne vous fiez pas.", 2),
    ("Produit correct, sans plus. Fait le travail mais rien d'exceptionnel. Prix moyen.", 3),
    ("Moyen, la qualité pourrait être mieux. Acceptable pour le prix mais sans plus.", 3),
    ("Ça va, ni bon ni mauvais. Répond aux besoins de base. On trouve mieux ailleurs.", 3),
    ("Correct pour dépanner. Qualité moyenne, service client moyen. Rien d'extraordinaire.", 3),
];

/// Reference replies used as training targets
fn training_reply(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => {
            "Merci beaucoup pour votre retour positif ! Nous sommes ravis que le produit vous satisfasse pleinement."
        }
        SentimentLabel::Negative => {
            "Nous sommes désolés que le produit n'ait pas répondu à vos attentes. Contactez notre service client pour une solution."
        }
        SentimentLabel::Neutral => {
            "Merci pour votre retour. Nous prenons note de vos commentaires pour améliorer nos produits."
        }
    }
}

/// The built-in synthetic dataset: six positive, six negative, four neutral reviews
pub fn synthetic_reviews() -> Vec<DatasetReview> {
    SYNTHETIC
        .iter()
        .map(|(text, rating)| DatasetReview {
            review_text: text.to_string(),
            rating: *rating,
            source: "synthetic".to_string(),
        })
        .collect()
}

pub fn load_reviews(path: &Path) -> Result<Vec<DatasetReview>> {
    let content = std::fs::read_to_string(path)?;
    let reviews: Vec<DatasetReview> = serde_json::from_str(&content)?;
    debug!(count = reviews.len(), path = %path.display(), "Loaded review dataset");
    Ok(reviews)
}

/// Write `value` as pretty-printed JSON
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Validate reviews and turn them into training pairs.
///
/// Invalid reviews (blank or too-long text, rating outside 1..=5) are skipped.
/// Sentiment comes from the processor's rating thresholds.
pub fn prepare_training_pairs(reviews: &[DatasetReview], processor: &ReviewProcessor) -> Vec<TrainingPair> {
    let pairs: Vec<TrainingPair> = reviews
        .iter()
        .filter_map(|review| {
            let rating = Rating::new(review.rating).ok()?;
            let validated = Review::new(review.review_text.as_str(), Some(rating)).ok()?;
            let sentiment = processor.classifier().classify_by_rating(rating);

            Some(TrainingPair {
                input: format!("Avis client: {}", validated.text()),
                output: training_reply(sentiment).to_string(),
                sentiment,
                rating: rating.get(),
                source: review.source.clone(),
            })
        })
        .collect();

    info!(
        prepared = pairs.len(),
        skipped = reviews.len() - pairs.len(),
        "Training pairs prepared"
    );
    pairs
}

/// One `prompt <|endoftext|> reply <|endoftext|>` line per pair
pub fn to_text_format(pairs: &[TrainingPair]) -> String {
    pairs
        .iter()
        .map(|pair| format!("{} {END_OF_TEXT} {} {END_OF_TEXT}", pair.input, pair.output))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn dataset_stats(reviews: &[DatasetReview]) -> DatasetStats {
    let mut by_rating = BTreeMap::new();
    let mut by_source = BTreeMap::new();
    let mut total_chars = 0usize;

    for review in reviews {
        *by_rating.entry(review.rating).or_insert(0) += 1;
        *by_source.entry(review.source.clone()).or_insert(0) += 1;
        total_chars += review.review_text.chars().count();
    }

    let avg_text_length = if reviews.is_empty() {
        0.0
    } else {
        (total_chars as f64 / reviews.len() as f64 * 10.0).round() / 10.0
    };

    DatasetStats {
        total_reviews: reviews.len(),
        by_rating,
        by_source,
        avg_text_length,
    }
}

/// Compare keyword classification of the cleaned text with the rating label
pub fn evaluate(reviews: &[DatasetReview], processor: &ReviewProcessor) -> Evaluation {
    let mut evaluation = Evaluation {
        evaluated: 0,
        skipped: 0,
        correct: 0,
        confusion: BTreeMap::new(),
    };

    for review in reviews {
        let Ok(rating) = Rating::new(review.rating) else {
            evaluation.skipped += 1;
            continue;
        };
        if Review::new(review.review_text.as_str(), Some(rating)).is_err() {
            evaluation.skipped += 1;
            continue;
        }

        let expected = processor.classifier().classify_by_rating(rating);
        let cleaned = processor.normalizer().normalize(&review.review_text);
        let predicted = processor.classifier().classify_by_text(&cleaned);

        evaluation.evaluated += 1;
        if expected == predicted {
            evaluation.correct += 1;
        }
        *evaluation
            .confusion
            .entry(expected)
            .or_default()
            .entry(predicted)
            .or_insert(0) += 1;
    }

    evaluation
}
