//! Error types for the reviews proxy.
//!
//! Two layers, both built with `thiserror`:
//!
//! - [`UpstreamError`] classifies what went wrong talking to the Places API.
//! - [`ReviewsError`] is what the controller returns. Fetch and refresh failures
//!   carry their upstream cause so the HTTP layer can still report its kind.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `ReviewsError`.
pub type Result<T> = std::result::Result<T, ReviewsError>;

/// Stable, machine-readable error codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The caller omitted the place identifier.
    MissingParameter,
    /// The query string could not be read.
    InvalidParameter,
    /// Upstream returned no result for the place.
    InvalidPlace,
    /// Upstream returned a result without reviews.
    NoReviewsAvailable,
    /// Upstream rejected the request.
    UpstreamApiError,
    /// Upstream could not be reached.
    UpstreamUnreachable,
    /// Anything not covered above.
    UnexpectedError,
    /// Invalid local configuration.
    ConfigError,
}

impl ErrorKind {
    /// Returns the wire code for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingParameter => "MISSING_PARAMETER",
            ErrorKind::InvalidParameter => "INVALID_PARAMETER",
            ErrorKind::InvalidPlace => "INVALID_PLACE",
            ErrorKind::NoReviewsAvailable => "NO_REVIEWS_AVAILABLE",
            ErrorKind::UpstreamApiError => "UPSTREAM_API_ERROR",
            ErrorKind::UpstreamUnreachable => "UPSTREAM_UNREACHABLE",
            ErrorKind::UnexpectedError => "UNEXPECTED_ERROR",
            ErrorKind::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single upstream reviews request.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum UpstreamError {
    /// Upstream responded without any result payload.
    #[error("No result returned for place '{0}'")]
    InvalidPlace(String),

    /// Upstream returned a result but no reviews field.
    #[error("No reviews available for place '{0}'")]
    NoReviewsAvailable(String),

    /// Upstream answered with an error status or error body.
    #[error("Upstream API error ({status}): {message}")]
    Api {
        /// HTTP status code or Places API status string
        status: String,
        /// Upstream error message
        message: String,
    },

    /// No response was received (connect failure, timeout).
    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    /// Anything else that went wrong during the call.
    #[error("Unexpected upstream failure: {0}")]
    Unexpected(String),
}

impl UpstreamError {
    /// Returns the stable code for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UpstreamError::InvalidPlace(_) => ErrorKind::InvalidPlace,
            UpstreamError::NoReviewsAvailable(_) => ErrorKind::NoReviewsAvailable,
            UpstreamError::Api { .. } => ErrorKind::UpstreamApiError,
            UpstreamError::Unreachable(_) => ErrorKind::UpstreamUnreachable,
            UpstreamError::Unexpected(_) => ErrorKind::UnexpectedError,
        }
    }
}

/// Main error type for controller operations.
#[derive(Debug, Error)]
pub enum ReviewsError {
    /// A required request parameter was absent or empty.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// A cache miss could not be filled from upstream.
    #[error("Failed to fetch reviews: {0}")]
    FetchFailed(#[source] UpstreamError),

    /// A forced refresh could not be completed.
    #[error("Failed to refresh reviews: {0}")]
    RefreshFailed(#[source] UpstreamError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ReviewsError {
    /// Returns the stable code for this error.
    ///
    /// Fetch and refresh failures report the kind of their upstream cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReviewsError::MissingParameter(_) => ErrorKind::MissingParameter,
            ReviewsError::FetchFailed(e) | ReviewsError::RefreshFailed(e) => e.kind(),
            ReviewsError::ConfigError(_) => ErrorKind::ConfigError,
        }
    }

    /// Returns the upstream cause, if this error has one.
    pub fn upstream(&self) -> Option<&UpstreamError> {
        match self {
            ReviewsError::FetchFailed(e) | ReviewsError::RefreshFailed(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReviewsError::MissingParameter(_))
    }
}
