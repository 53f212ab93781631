use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::{providers::SearchError, selection::SelectionError};

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Credentials never leak into the response body
            AppError::Search(SearchError::Config(ref detail)) => {
                tracing::error!(detail = %detail, "Search provider is misconfigured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Search is currently unavailable.".to_string(),
                )
            }
            AppError::Search(SearchError::HardFailure(msg)) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Selection(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
