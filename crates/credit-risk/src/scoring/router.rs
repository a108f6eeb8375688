use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{LoanApplication, ModelChoice};
use super::service::{ScoringService, ScoringServiceError};
use super::views::{ApplicationReview, ModelsView};

/// Router builder exposing the review, scoring, and model-listing endpoints.
pub fn scoring_router(service: Arc<ScoringService>) -> Router {
    Router::new()
        .route("/api/v1/risk/applications/review", post(review_handler))
        .route("/api/v1/risk/applications/score", post(score_handler))
        .route("/api/v1/risk/models", get(models_handler))
        .with_state(service)
}

/// Scoring request: the raw applicant record plus the operator's model
/// choice (defaults to XGBoost).
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(flatten)]
    pub application: LoanApplication,
    #[serde(default)]
    pub model: ModelChoice,
}

pub(crate) async fn review_handler(
    State(service): State<Arc<ScoringService>>,
    Json(application): Json<LoanApplication>,
) -> Json<ApplicationReview> {
    Json(service.review(&application))
}

pub(crate) async fn score_handler(
    State(service): State<Arc<ScoringService>>,
    Json(request): Json<ScoreRequest>,
) -> Response {
    match service.score(&request.application, request.model) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error @ (ScoringServiceError::Intake(_) | ScoringServiceError::Validation(_))) => {
            let payload = json!({
                "valid": false,
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(error @ ScoringServiceError::ModelUnavailable) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn models_handler(
    State(service): State<Arc<ScoringService>>,
) -> Json<ModelsView> {
    Json(service.models())
}
