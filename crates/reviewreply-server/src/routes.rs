//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use reviewreply_core::{Error, Review, ReviewAnalysis, SentimentLabel};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Review analysis request; the French field names are accepted as aliases
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyseRequest {
    #[serde(alias = "texte")]
    pub text: String,

    #[serde(default, alias = "note_numerique")]
    pub rating: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub mode: String,
}

#[derive(Debug, Deserialize)]
pub struct DebugTextRequest {
    #[serde(alias = "texte")]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct DebugTextResponse {
    pub original: String,
    pub cleaned: String,
    pub keyword_sentiment: SentimentLabel,
    pub positive_hits: usize,
    pub negative_hits: usize,
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "name": "ReviewReply",
        "description": "Customer review sentiment analysis and automatic replies",
        "version": VERSION,
        "endpoints": {
            "analyse": "POST /analyse - analyse a customer review",
            "health": "GET /health - service health",
            "stats": "GET /stats - service statistics",
            "metrics": "GET /metrics - Prometheus metrics",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        mode: state.mode().to_string(),
    })
}

/// Analyse a review and return its sentiment and reply
pub async fn analyse(
    State(state): State<AppState>,
    payload: Result<Json<AnalyseRequest>, JsonRejection>,
) -> Result<Json<ReviewAnalysis>, AppError> {
    let result = async {
        let Json(request) = payload.map_err(|rejection| Error::invalid_input(rejection.body_text()))?;
        let review = Review::with_raw_rating(request.text, request.rating)?;
        state.pipeline.analyse(review).await
    }
    .await;

    match result {
        Ok(analysis) => {
            info!(
                sentiment = %analysis.sentiment,
                confidence = %analysis.confidence,
                source = analysis.source.as_str(),
                "Review analysed"
            );
            Ok(Json(analysis))
        }
        Err(e) => {
            state.metrics.record_error(e.kind());
            Err(e.into())
        }
    }
}

pub async fn stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    let generation = &state.config.generation;
    let snapshot = state.metrics.snapshot();

    let candidate_models = if generation.enabled {
        generation.model.candidate_names()
    } else {
        Vec::new()
    };

    Json(json!({
        "generative_mode": generation.enabled,
        "mode": state.mode(),
        "candidate_models": candidate_models,
        "loaded_model": state.pipeline.selector().generator_name(),
        "version": VERSION,
        "avg_latency_us": snapshot.avg_latency_us(),
        "model_response_rate": snapshot.model_response_rate(),
        "counters": snapshot,
    }))
}

/// Show how a text is cleaned and keyword-classified. Debug mode only.
pub async fn debug_text(
    State(state): State<AppState>,
    payload: Result<Json<DebugTextRequest>, JsonRejection>,
) -> Result<Json<DebugTextResponse>, AppError> {
    if !state.config.server.debug {
        return Err(AppError::NotFound(
            "Endpoint only available in debug mode".to_string(),
        ));
    }

    let Json(request) = payload.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;

    let processor = state.pipeline.processor();
    let hits = processor.classifier().keyword_hits(&request.text);

    Ok(Json(DebugTextResponse {
        cleaned: processor.normalizer().normalize(&request.text),
        original: request.text,
        keyword_sentiment: hits.label(),
        positive_hits: hits.positive,
        negative_hits: hits.negative,
    }))
}

pub async fn metrics(State(state): State<AppState>) -> Result<Response, AppError> {
    let handle = state
        .metrics_handle
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Metrics exporter not installed".to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response())
}

pub async fn fallback() -> AppError {
    AppError::NotFound("Not found".to_string())
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    NotFound(String),
    InternalError,
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => {
                warn!(error = %msg, "Rejected invalid review");
                AppError::InvalidRequest(msg)
            }
            other => {
                error!(error = %other, kind = other.kind(), "Review analysis failed");
                AppError::InternalError
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, kind) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, "invalid_request_error"),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "not_found_error"),
            AppError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process the review. Please try again.".to_string(),
                "api_error",
            ),
        };

        let body = json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
