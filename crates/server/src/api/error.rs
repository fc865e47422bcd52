use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recommender::RecommendError;
use serde_json::json;

/// Errors a request can end in
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Body missing, not JSON, or without a `movie` string
    #[error("No movie title provided.")]
    MissingTitle,

    #[error("Movie not found. Please try another title.")]
    NotFound,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::NotFound { .. } => AppError::NotFound,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingTitle => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
