use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::app::AppState;
use crate::query::Answer;

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendationRequest {
    utterance: String,
}

#[derive(Debug, Serialize)]
struct RecommendationResponse {
    emotion: String,
    confidence: f32,
    glyph: &'static str,
    matched: bool,
    titles: Vec<String>,
}

impl From<Answer> for RecommendationResponse {
    fn from(answer: Answer) -> Self {
        Self {
            matched: answer.recommendations.is_match(),
            titles: answer.recommendations.titles().to_vec(),
            emotion: answer.emotion.to_string(),
            confidence: answer.confidence,
            glyph: answer.glyph,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Answers one utterance. Blank utterances get `204 No Content`.
pub(crate) async fn recommend(
    State(state): State<AppState>,
    Json(payload): Json<RecommendationRequest>,
) -> Response {
    let engine = state.engine().clone();
    // Classification may block on model inference or outbound HTTP.
    let answer = tokio::task::spawn_blocking(move || engine.answer(&payload.utterance)).await;

    match answer {
        Ok(Some(answer)) => Json(RecommendationResponse::from(answer)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(join_error) => {
            error!(error = %join_error, "recommendation task failed");
            let body = Json(ErrorResponse {
                error: "recommendation failed".into(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
    }
}
