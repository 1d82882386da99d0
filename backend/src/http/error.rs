//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (bad id, bad paging parameters)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Repository(RepositoryError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Repository(RepositoryError::ValidationError { .. }) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::NotFound(msg) => ApiError::new("NOT_FOUND", msg),
            AppError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg),
            AppError::Internal(msg) => ApiError::new("INTERNAL_ERROR", msg),
            AppError::Repository(e) => {
                let code = match status {
                    StatusCode::NOT_FOUND => "NOT_FOUND",
                    StatusCode::BAD_REQUEST => "VALIDATION_ERROR",
                    _ => "REPOSITORY_ERROR",
                };
                let api_error = ApiError::new(code, e.to_string());
                match e.context().details.clone() {
                    Some(details) => api_error.with_details(details),
                    None => api_error,
                }
            }
        };

        if status.is_server_error() {
            tracing::error!("{} {}: {}", status, error.code, error.message);
        }

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
