//! Deployment smoke test
//!
//! Calls `/health`, then posts a few labelled reviews to `/analyse`. A request
//! that fails or returns an unusable body fails the check; a sentiment other
//! than the expected one is reported as a mismatch only.

use crate::routes::HealthResponse;
use reviewreply_core::{Error, Result, SentimentLabel};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

/// A labelled review sent to the deployment
#[derive(Debug, Clone)]
pub struct CheckCase {
    pub name: &'static str,
    pub text: &'static str,
    pub expected: SentimentLabel,
}

pub const CHECK_CASES: &[CheckCase] = &[
    CheckCase {
        name: "positive",
        text: "Produit absolument fantastique! Service client exceptionnel, livraison rapide. Je recommande vivement! 😊",
        expected: SentimentLabel::Positive,
    },
    CheckCase {
        name: "negative",
        text: "Très déçu du produit. Mauvaise qualité, livraison en retard et colis abîmé.",
        expected: SentimentLabel::Negative,
    },
    CheckCase {
        name: "neutral",
        text: "Produit correct, sans plus. Prix raisonnable mais rien d'exceptionnel.",
        expected: SentimentLabel::Neutral,
    },
    CheckCase {
        name: "emoji and url",
        text: "Super produit! 👍😊 Voir ici: http://example.com #satisfied",
        expected: SentimentLabel::Positive,
    },
];

#[derive(Debug, Deserialize)]
struct AnalyseReply {
    sentiment: SentimentLabel,
    response: String,
}

/// Outcome of a single case
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub name: &'static str,
    pub expected: SentimentLabel,
    pub actual: Option<SentimentLabel>,
    pub error: Option<String>,
}

impl CaseResult {
    pub fn matched(&self) -> bool {
        self.actual == Some(self.expected)
    }
}

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub health: HealthResponse,
    pub cases: Vec<CaseResult>,
}

impl CheckReport {
    pub fn failures(&self) -> usize {
        self.cases.iter().filter(|c| c.error.is_some()).count()
    }

    pub fn mismatches(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| c.error.is_none() && !c.matched())
            .count()
    }
}

/// Run the smoke test against `target`. Errors when `/health` is unreachable.
pub async fn run_check(target: &str) -> Result<CheckReport> {
    let base = target.trim_end_matches('/');
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| Error::internal(format!("Failed to build HTTP client: {e}")))?;

    let health: HealthResponse = client
        .get(format!("{base}/health"))
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| Error::internal(format!("Health check failed: {e}")))?
        .json()
        .await
        .map_err(|e| Error::internal(format!("Invalid health response: {e}")))?;

    info!(status = %health.status, version = %health.version, mode = %health.mode, "Deployment healthy");

    let mut cases = Vec::with_capacity(CHECK_CASES.len());
    for case in CHECK_CASES {
        let result = client
            .post(format!("{base}/analyse"))
            .json(&json!({ "text": case.text }))
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let outcome = match result {
            Ok(response) => response.json::<AnalyseReply>().await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        let case_result = match outcome {
            Ok(reply) if reply.response.trim().is_empty() => CaseResult {
                name: case.name,
                expected: case.expected,
                actual: Some(reply.sentiment),
                error: Some("empty reply".to_string()),
            },
            Ok(reply) => CaseResult {
                name: case.name,
                expected: case.expected,
                actual: Some(reply.sentiment),
                error: None,
            },
            Err(e) => CaseResult {
                name: case.name,
                expected: case.expected,
                actual: None,
                error: Some(e),
            },
        };

        if let Some(error) = &case_result.error {
            warn!(case = case.name, error = %error, "Check case failed");
        } else if !case_result.matched() {
            warn!(
                case = case.name,
                expected = %case.expected,
                actual = ?case_result.actual,
                "Sentiment mismatch"
            );
        }
        cases.push(case_result);
    }

    Ok(CheckReport { health, cases })
}
