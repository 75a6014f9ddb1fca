//! HTTP API tests against the router, without binding a socket

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use reviewreply_core::Result;
use reviewreply_responder::{GenerationParams, ResponseTemplateSet, TextGenerator};
use reviewreply_server::{build_router, AppState, ServiceConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct ScriptedModel(&'static str);

impl TextGenerator for ScriptedModel {
    fn generate(&self, prompt: &str, _params: &GenerationParams) -> Result<String> {
        Ok(format!("{prompt} {}", self.0))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn app_with(config: ServiceConfig, generator: Option<Arc<dyn TextGenerator>>) -> Router {
    build_router(AppState::new(config, generator).unwrap())
}

fn app() -> Router {
    app_with(ServiceConfig::default(), None)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn is_template(label: reviewreply_core::SentimentLabel, text: &str) -> bool {
    ResponseTemplateSet::default().contains(label, text)
}

#[tokio::test]
async fn test_health_in_fallback_mode() {
    let (status, body) = send(app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["mode"], "fallback");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let (status, body) = send(app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"]["analyse"].is_string());
}

#[tokio::test]
async fn test_analyse_positive_review() {
    let request = post_json("/analyse", &json!({ "text": "Produit fantastique! 😊 http://t.co" }));
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "positive");
    assert_eq!(body["cleaned_text"], "produit fantastique");
    assert_eq!(body["confidence"], "high");

    let response = body["response"].as_str().unwrap();
    assert!(is_template(reviewreply_core::SentimentLabel::Positive, response));
    assert!(body.get("source").is_none());
}

#[tokio::test]
async fn test_analyse_french_field_names_and_rating() {
    let request = post_json(
        "/analyse",
        &json!({ "texte": "Excellent, parfait, génial", "note_numerique": 1 }),
    );
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "negative");
    assert_eq!(body["confidence"], "very high");
}

#[tokio::test]
async fn test_analyze_alias_route() {
    let request = post_json("/analyze", &json!({ "text": "Horrible, catastrophique et nul" }));
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "negative");
}

#[tokio::test]
async fn test_short_text_has_low_confidence() {
    let request = post_json("/analyse", &json!({ "text": "Top!" }));
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["confidence"], "low");
}

#[tokio::test]
async fn test_invalid_input_is_rejected() {
    let cases = [
        json!({ "text": "" }),
        json!({ "text": "a".repeat(2001) }),
        json!({ "text": "Bon produit", "rating": 0 }),
        json!({ "text": "Bon produit", "rating": 6 }),
        json!({ "text": "Bon produit", "rating": "cinq" }),
        json!({ "rating": 4 }),
    ];

    for case in cases {
        let (status, body) = send(app(), post_json("/analyse", &case)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "case {case}");
        assert_eq!(body["error"]["type"], "invalid_request_error");
        assert!(body["error"]["message"].is_string());
    }
}

#[tokio::test]
async fn test_blank_text_gets_neutral_template() {
    let (status, body) = send(app(), post_json("/analyse", &json!({ "text": "   " }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "neutral");
    assert_eq!(body["confidence"], "low");
    assert_eq!(body["cleaned_text"], "");
    let response = body["response"].as_str().unwrap();
    assert!(is_template(reviewreply_core::SentimentLabel::Neutral, response));
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/analyse")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let body = json!({ "text": "x".repeat(70 * 1024) }).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/analyse")
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap();
    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_debug_endpoint_hidden_by_default() {
    let (status, body) = send(app(), post_json("/debug/text", &json!({ "text": "super" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found_error");
}

#[tokio::test]
async fn test_debug_endpoint_in_debug_mode() {
    let mut config = ServiceConfig::default();
    config.server.debug = true;

    let request = post_json("/debug/text", &json!({ "texte": "Super produit mais livraison lente!" }));
    let (status, body) = send(app_with(config, None), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original"], "Super produit mais livraison lente!");
    assert_eq!(body["cleaned"], "super produit livraison lente");
    assert_eq!(body["positive_hits"], 1);
    assert_eq!(body["negative_hits"], 1);
    assert_eq!(body["keyword_sentiment"], "neutral");
}

#[tokio::test]
async fn test_stats_reflect_requests() {
    let app = app();

    let request = post_json("/analyse", &json!({ "text": "Excellent produit", "rating": 5 }));
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app.clone(), post_json("/analyse", &json!({ "text": "" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(app, get("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generative_mode"], false);
    assert_eq!(body["candidate_models"], json!([]));
    assert!(body["loaded_model"].is_null());
    assert_eq!(body["counters"]["total_requests"], 1);
    assert_eq!(body["counters"]["positive"], 1);
    assert_eq!(body["counters"]["errors"], 1);
}

#[tokio::test]
async fn test_metrics_without_exporter() {
    let (status, _) = send(app(), get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, body) = send(app(), get("/v1/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Not found");
}

#[tokio::test]
async fn test_model_mode_uses_generated_reply() {
    let mut config = ServiceConfig::default();
    config.generation.enabled = true;
    let generator: Arc<dyn TextGenerator> =
        Arc::new(ScriptedModel("Merci pour ce retour, toute l'équipe est ravie !"));
    let app = app_with(config, Some(generator));

    let (_, health) = send(app.clone(), get("/health")).await;
    assert_eq!(health["mode"], "ai");

    let request = post_json("/analyse", &json!({ "text": "Produit fantastique, livraison rapide" }));
    let (status, body) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Merci pour ce retour, toute l'équipe est ravie !");

    let (_, stats) = send(app, get("/stats")).await;
    assert_eq!(stats["loaded_model"], "scripted");
    assert_eq!(stats["counters"]["model_responses"], 1);
    assert!(!stats["candidate_models"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_model_mode_falls_back_on_short_reply() {
    let mut config = ServiceConfig::default();
    config.generation.enabled = true;
    let app = app_with(config, Some(Arc::new(ScriptedModel("Ok."))));

    let request = post_json("/analyse", &json!({ "text": "Produit fantastique, livraison rapide" }));
    let (status, body) = send(app.clone(), request).await;

    assert_eq!(status, StatusCode::OK);
    let response = body["response"].as_str().unwrap();
    assert!(is_template(reviewreply_core::SentimentLabel::Positive, response));

    let (_, stats) = send(app, get("/stats")).await;
    assert_eq!(stats["counters"]["model_fallbacks"], 1);
    assert_eq!(stats["counters"]["template_responses"], 1);
}

#[tokio::test]
async fn test_enabled_without_model_stays_in_fallback() {
    let mut config = ServiceConfig::default();
    config.generation.enabled = true;
    let (_, body) = send(app_with(config, None), get("/health")).await;
    assert_eq!(body["mode"], "fallback");
}
