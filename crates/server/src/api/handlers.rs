use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use recommender::Recommendation;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::{AppError, AppResult};
use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub movie: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub movies: usize,
}

// Handlers

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        movies: state.recommender.catalog().len(),
    })
}

/// `POST /recommend` with `{"movie": "<title>"}`
pub async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<RecommendResponse>> {
    let title = match payload {
        Ok(Json(RecommendRequest { movie: Some(title) })) => title,
        Ok(_) => return Err(AppError::MissingTitle),
        Err(rejection) => {
            warn!("Rejected recommend request: {}", rejection);
            return Err(AppError::MissingTitle);
        }
    };

    // Scoring walks the whole catalog; keep it off the async workers
    let recommender = state.recommender.clone();
    let query = title.clone();
    let recommendations = tokio::task::spawn_blocking(move || recommender.recommend(&query))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    info!(
        "Returning {} recommendations for '{}'",
        recommendations.len(),
        title
    );

    Ok(Json(RecommendResponse { recommendations }))
}
