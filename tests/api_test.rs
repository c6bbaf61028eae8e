mod support;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use mood_recommender::app::{ComponentRegistry, build_router};
use mood_recommender::catalog::IndexedMovie;
use mood_recommender::config::Config;
use mood_recommender::observability::Telemetry;

use support::{RecordingModel, adapter, indexed};

fn router(model: &RecordingModel, movies: &[IndexedMovie]) -> axum::Router {
    let config = Config::from_env().expect("default config");
    let telemetry = Telemetry::new().expect("telemetry");
    let registry = ComponentRegistry::from_parts(config, telemetry, adapter(model), movies);
    build_router(Arc::new(registry))
}

fn recommend_request(utterance: &str) -> Request<Body> {
    Request::post("/v1/recommendations")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "utterance": utterance }).to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn recommends_titles_for_the_detected_emotion() {
    let model = RecordingModel::returning(&[("joy", 0.92), ("neutral", 0.08)]);
    let app = router(&model, &[indexed("Movie A", &["joy"]), indexed("Movie B", &["joy"])]);

    let response = app.oneshot(recommend_request("I am so happy today")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["emotion"], "joy");
    assert_eq!(body["glyph"], "😄");
    assert_eq!(body["matched"], true);
    assert_eq!(body["titles"], json!(["Movie A", "Movie B"]));
    assert!((body["confidence"].as_f64().unwrap() - 0.92).abs() < 1e-6);
}

#[tokio::test]
async fn miss_is_reported_as_unmatched() {
    let model = RecordingModel::failing();
    let app = router(&model, &[indexed("Movie A", &["joy"])]);

    let response = app.oneshot(recommend_request("hello")).await.unwrap();

    let body = body_json(response).await;
    assert_eq!(body["emotion"], "neutre");
    assert_eq!(body["matched"], false);
    assert_eq!(body["titles"], json!([]));
}

#[tokio::test]
async fn blank_utterance_gets_no_content() {
    let model = RecordingModel::returning(&[("joy", 0.9)]);
    let app = router(&model, &[indexed("Movie A", &["joy"])]);

    let response = app.oneshot(recommend_request("   ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(model.calls().is_empty());
}

#[tokio::test]
async fn readiness_depends_on_the_index() {
    let model = RecordingModel::returning(&[("joy", 0.9)]);

    let empty = router(&model, &[indexed("Untagged", &[])]);
    let response = empty
        .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], "degraded");

    let loaded = router(&model, &[indexed("Movie A", &["joy"])]);
    let response = loaded
        .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ready");
}

#[tokio::test]
async fn liveness_always_answers() {
    let model = RecordingModel::returning(&[("joy", 0.9)]);
    let response = router(&model, &[])
        .oneshot(Request::get("/health/live").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_count_queries() {
    let model = RecordingModel::returning(&[("joy", 0.9)]);
    let app = router(&model, &[indexed("Movie A", &["joy"])]);

    let _ = app.clone().oneshot(recommend_request("yay")).await.unwrap();
    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("mood_queries_total 1"));
}
