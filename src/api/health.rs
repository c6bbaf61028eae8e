use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::warn;

use crate::app::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) struct HealthReport {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl HealthReport {
    fn ready(detail: impl Into<String>) -> Self {
        Self {
            status: "ready",
            detail: Some(detail.into()),
        }
    }

    fn degraded(detail: impl Into<String>) -> Self {
        Self {
            status: "degraded",
            detail: Some(detail.into()),
        }
    }
}

/// Ready once the index holds at least one label.
pub(crate) async fn ready(
    State(state): State<AppState>,
) -> Result<Json<HealthReport>, (StatusCode, Json<HealthReport>)> {
    let index = state.engine().index();
    if index.is_empty() {
        warn!(movies = index.movie_count(), "readiness check failed: emotion index is empty");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthReport::degraded("emotion index is empty")),
        ));
    }

    Ok(Json(HealthReport::ready(format!(
        "{} labels over {} movies",
        index.len(),
        index.movie_count()
    ))))
}

pub(crate) async fn live() -> Json<HealthReport> {
    Json(HealthReport {
        status: "live",
        detail: None,
    })
}
