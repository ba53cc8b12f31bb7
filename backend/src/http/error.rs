//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::scheduler::GenerationError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
    /// Timetable generation error
    Generation(GenerationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) => repository_response(e),
            AppError::Generation(e) => match e {
                GenerationError::NoCourses { .. } => {
                    (StatusCode::NOT_FOUND, ApiError::new("NO_COURSES", e.to_string()))
                }
                GenerationError::Infeasible { .. } => (
                    StatusCode::CONFLICT,
                    ApiError::new("SCHEDULING_INFEASIBLE", e.to_string()),
                ),
                GenerationError::Repository(inner) => repository_response(inner),
            },
        };

        (status, Json(error)).into_response()
    }
}

fn repository_response(err: RepositoryError) -> (StatusCode, ApiError) {
    let message = err.to_string();
    match err {
        RepositoryError::NotFound(_) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message)),
        RepositoryError::ValidationError(_) => (
            StatusCode::BAD_REQUEST,
            ApiError::new("VALIDATION_ERROR", message),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("REPOSITORY_ERROR", message),
        ),
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::Generation(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
