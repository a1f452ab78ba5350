//! API error handling.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reviews_core::error::{ErrorKind, ReviewsError};

use crate::dto::ErrorResponse;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(
        status: StatusCode,
        error: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            error: error.into(),
            kind,
            message: message.into(),
        }
    }

    /// Bad request error.
    pub fn bad_request(error: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, kind, message)
    }

    /// Internal server error.
    pub fn internal(error: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error, kind, message)
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Error kind reported to the client.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.error,
            kind: self.kind,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<ReviewsError> for ApiError {
    fn from(err: ReviewsError) -> Self {
        let kind = err.kind();
        match &err {
            ReviewsError::MissingParameter(param) => {
                ApiError::bad_request(format!("{} is required", param), kind, err.to_string())
            }
            ReviewsError::FetchFailed(cause) => {
                tracing::error!(error = %err, %kind, "Failed to fetch reviews");
                ApiError::internal("Failed to fetch reviews", kind, cause.to_string())
            }
            ReviewsError::RefreshFailed(cause) => {
                tracing::error!(error = %err, %kind, "Failed to refresh reviews");
                ApiError::internal("Failed to refresh reviews", kind, cause.to_string())
            }
            ReviewsError::ConfigError(_) => {
                tracing::error!(error = %err, "Configuration error");
                ApiError::internal("An internal error occurred", kind, err.to_string())
            }
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected query string");
        ApiError::bad_request(
            "Invalid query string",
            ErrorKind::InvalidParameter,
            rejection.body_text(),
        )
    }
}
