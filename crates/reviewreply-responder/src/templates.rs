//! Canned reply templates per sentiment

use reviewreply_core::{Error, Result, SentimentLabel};
use serde::{Deserialize, Serialize};

/// Every template must be at least this long, in characters
pub const MIN_TEMPLATE_CHARS: usize = 20;

const POSITIVE: [&str; 3] = [
    "Merci beaucoup pour votre retour positif ! Nous sommes ravis que notre produit vous satisfasse. Votre satisfaction est notre priorité.",
    "Quel plaisir de lire votre commentaire ! Nous apprécions vraiment votre confiance et espérons continuer à vous satisfaire.",
    "Nous sommes enchantés de votre satisfaction ! Merci de partager votre expérience positive avec nous.",
];

const NEGATIVE: [&str; 3] = [
    "Nous vous remercions pour votre retour et nous excusons sincèrement pour les désagréments rencontrés. Notre équipe va examiner votre cas avec attention.",
    "Votre expérience nous tient à cœur et nous regrettons que nos services n'aient pas été à la hauteur de vos attentes. Nous travaillons à nous améliorer.",
    "Nous prenons vos commentaires très au sérieux et nous nous engageons à trouver une solution rapide à votre problème.",
];

const NEUTRAL: [&str; 3] = [
    "Merci pour votre retour constructif. Nous prenons tous les commentaires en considération pour améliorer continuellement nos services.",
    "Nous apprécions votre feedback équilibré qui nous aide à mieux comprendre les besoins de nos clients.",
    "Votre avis nous guide dans nos efforts d'amélioration continue. Merci de prendre le temps de nous faire part de vos observations.",
];

/// Optional per-label template overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default)]
    pub positive: Option<Vec<String>>,

    #[serde(default)]
    pub negative: Option<Vec<String>>,

    #[serde(default)]
    pub neutral: Option<Vec<String>>,
}

/// Read-only mapping from sentiment to its reply templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTemplateSet {
    positive: Vec<String>,
    negative: Vec<String>,
    neutral: Vec<String>,
}

impl ResponseTemplateSet {
    /// Build a template set, rejecting empty lists and too-short templates
    pub fn new(positive: Vec<String>, negative: Vec<String>, neutral: Vec<String>) -> Result<Self> {
        let set = Self {
            positive,
            negative,
            neutral,
        };

        for label in SentimentLabel::ALL {
            let templates = set.for_label(label);
            if templates.is_empty() {
                return Err(Error::config(format!("no {label} response templates configured")));
            }
            if let Some(short) = templates
                .iter()
                .find(|t| t.trim().chars().count() < MIN_TEMPLATE_CHARS)
            {
                return Err(Error::config(format!(
                    "{label} response template shorter than {MIN_TEMPLATE_CHARS} characters: {short:?}"
                )));
            }
        }

        Ok(set)
    }

    /// Built-in templates with per-label overrides applied
    pub fn from_config(config: &TemplateConfig) -> Result<Self> {
        let pick = |custom: &Option<Vec<String>>, builtin: &[&str]| {
            custom
                .clone()
                .unwrap_or_else(|| builtin.iter().map(|t| t.to_string()).collect())
        };

        Self::new(
            pick(&config.positive, &POSITIVE),
            pick(&config.negative, &NEGATIVE),
            pick(&config.neutral, &NEUTRAL),
        )
    }

    pub fn for_label(&self, label: SentimentLabel) -> &[String] {
        match label {
            SentimentLabel::Positive => &self.positive,
            SentimentLabel::Negative => &self.negative,
            SentimentLabel::Neutral => &self.neutral,
        }
    }

    pub fn contains(&self, label: SentimentLabel, text: &str) -> bool {
        self.for_label(label).iter().any(|t| t == text)
    }
}

impl Default for ResponseTemplateSet {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|t| t.to_string()).collect();
        Self {
            positive: owned(&POSITIVE),
            negative: owned(&NEGATIVE),
            neutral: owned(&NEUTRAL),
        }
    }
}
