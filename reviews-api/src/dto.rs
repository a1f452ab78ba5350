//! DTOs for API requests and responses.
//!
//! Review payloads are served straight from `reviews_core` types; only the
//! request query, health, and error shapes live here.

use serde::{Deserialize, Serialize};

use reviews_core::error::ErrorKind;

/// Query string accepted by the review routes.
#[derive(Debug, Default, Deserialize)]
pub struct PlaceQuery {
    /// Place identifier (`?placeId=`)
    #[serde(rename = "placeId", default)]
    pub place_id: Option<String>,
}

/// Error body.
///
/// `error` keeps the generic message older clients match on; `kind` and
/// `message` carry the distinguishing detail.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Generic, client-facing description
    pub error: String,
    /// Stable error code
    pub kind: ErrorKind,
    /// Detail from the underlying failure
    pub message: String,
}

/// Response for the health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the server state was built
    pub uptime_seconds: u64,
    /// Places currently held in the cache
    pub cached_places: usize,
    /// Cached places still within their TTL
    pub fresh_places: usize,
    /// Configured TTL in seconds
    pub cache_ttl_seconds: u64,
}
