use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Shared handler result type.
pub type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Transport-level error categories. Products translate their own errors into
/// one of these before anything reaches the wire.
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    /// Attach the request description rendered into `details`.
    pub fn with_context(self, context: impl Into<String>) -> ApiErrorResponse {
        ApiErrorResponse {
            error: self,
            context: context.into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

/// Uniform error payload written for every failed request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub details: String,
}

impl ErrorDetails {
    /// Stamp `err` with the current time.
    pub fn new(err: &ApiError, context: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: err.status().as_u16(),
            error: err.code().to_string(),
            message: err.to_string(),
            details: context.into(),
        }
    }
}

/// An [`ApiError`] bound to the request it failed.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    pub error: ApiError,
    pub context: String,
}

impl ApiErrorResponse {
    pub fn details(&self) -> ErrorDetails {
        ErrorDetails::new(&self.error, self.context.as_str())
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self.error {
            error!(error = ?source, context = %self.context, "request failed");
        }
        (self.error.status(), Json(self.details())).into_response()
    }
}
