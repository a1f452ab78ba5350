//! Places API client implementation.
//!
//! Requests the `reviews`, `rating`, and `user_ratings_total` fields from the
//! place-details endpoint and normalizes the answer into a [`ReviewSnapshot`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use reviews_core::constants::{
    DEFAULT_UPSTREAM_TIMEOUT_SECONDS, NON_ERROR_UPSTREAM_STATUSES, PLACE_DETAILS_URL,
    REQUESTED_FIELDS,
};
use reviews_core::error::{Result, ReviewsError, UpstreamError};
use reviews_core::traits::ReviewsUpstream;
use reviews_core::types::{PlaceId, Review, ReviewSnapshot};

/// Longest upstream body excerpt carried into errors and logs.
const MAX_BODY_EXCERPT: usize = 500;

/// Places client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Place-details endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl PlacesConfig {
    /// Creates config for the public Places endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: PLACE_DETAILS_URL.to_string(),
            timeout_seconds: DEFAULT_UPSTREAM_TIMEOUT_SECONDS,
        }
    }

    /// Points the client at a different place-details endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

impl fmt::Debug for PlacesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacesConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Client for the place-details endpoint.
///
/// Stateless apart from its connection pool; it never touches the cache.
pub struct PlacesClient {
    config: PlacesConfig,
    endpoint: Url,
    http_client: reqwest::Client,
}

impl PlacesClient {
    /// Creates a client with the given config.
    pub fn with_config(config: PlacesConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.base_url).map_err(|e| {
            ReviewsError::ConfigError(format!("invalid Places API URL '{}': {}", config.base_url, e))
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ReviewsError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            endpoint,
            http_client,
        })
    }

    /// Returns the configured endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches reviews and aggregate rating for `place`.
    #[instrument(skip(self, place), fields(place = %place))]
    pub async fn fetch(&self, place: &PlaceId) -> std::result::Result<ReviewSnapshot, UpstreamError> {
        let response = self
            .http_client
            .get(self.endpoint.clone())
            .query(&[
                ("place_id", place.as_str()),
                ("key", self.config.api_key.as_str()),
                ("fields", REQUESTED_FIELDS),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(place, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(place, e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<PlaceDetailsResponse>(&body)
                .ok()
                .and_then(|r| r.error_message)
                .unwrap_or_else(|| excerpt(&body).to_string());
            warn!(
                status = status.as_u16(),
                body = excerpt(&body),
                "Places API returned an error status"
            );
            return Err(UpstreamError::Api {
                status: status.as_u16().to_string(),
                message,
            });
        }

        let payload: PlaceDetailsResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = excerpt(&body), "Places API returned undecodable JSON");
            UpstreamError::Unexpected(format!("invalid JSON from Places API: {}", e))
        })?;

        let snapshot = payload.into_snapshot(place).map_err(|e| {
            warn!(error = %e, kind = %e.kind(), "Places API response rejected");
            e
        })?;

        debug!(
            reviews = snapshot.len(),
            total = snapshot.total_reviews,
            rating = snapshot.average_rating,
            "Fetched reviews"
        );
        Ok(snapshot)
    }

    fn transport_error(&self, place: &PlaceId, err: reqwest::Error) -> UpstreamError {
        // The request URL carries the API key; never let it reach logs or callers.
        let err = err.without_url();

        if err.is_timeout() || err.is_connect() || err.is_request() {
            warn!(
                endpoint = %self.endpoint,
                place = %place,
                timeout = err.is_timeout(),
                error = %err,
                "Places API unreachable"
            );
            UpstreamError::Unreachable(err.to_string())
        } else {
            warn!(endpoint = %self.endpoint, place = %place, error = %err, "Places API call failed");
            UpstreamError::Unexpected(err.to_string())
        }
    }
}

#[async_trait]
impl ReviewsUpstream for PlacesClient {
    async fn fetch_reviews(
        &self,
        place: &PlaceId,
    ) -> std::result::Result<ReviewSnapshot, UpstreamError> {
        self.fetch(place).await
    }
}

/// Place-details response envelope.
#[derive(Debug, Deserialize)]
struct PlaceDetailsResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    result: Option<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    reviews: Option<Vec<Review>>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    user_ratings_total: Option<u64>,
}

impl PlaceDetailsResponse {
    fn into_snapshot(self, place: &PlaceId) -> std::result::Result<ReviewSnapshot, UpstreamError> {
        if let Some(message) = self.error_message {
            return Err(UpstreamError::Api {
                status: self.status.unwrap_or_else(|| "UNKNOWN_ERROR".into()),
                message,
            });
        }

        if let Some(status) = self.status {
            if !NON_ERROR_UPSTREAM_STATUSES.contains(&status.as_str()) {
                return Err(UpstreamError::Api {
                    message: format!("Places API returned status {}", status),
                    status,
                });
            }
        }

        let result = self
            .result
            .ok_or_else(|| UpstreamError::InvalidPlace(place.to_string()))?;
        let reviews = result
            .reviews
            .ok_or_else(|| UpstreamError::NoReviewsAvailable(place.to_string()))?;

        Ok(ReviewSnapshot::new(
            place,
            reviews,
            result.user_ratings_total,
            result.rating,
        ))
    }
}

fn excerpt(body: &str) -> &str {
    if body.len() <= MAX_BODY_EXCERPT {
        return body;
    }
    let mut end = MAX_BODY_EXCERPT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
