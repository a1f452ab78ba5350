//! Constants for the reviews proxy.
//!
//! Upstream endpoints and cache lifetimes live here so every crate agrees on them.

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE LIFETIME
// ═══════════════════════════════════════════════════════════════════════════════

/// Snapshot time-to-live in milliseconds (24 hours).
pub const CACHE_TTL_MS: u64 = 86_400_000;

/// Snapshot time-to-live in seconds, for environment configuration.
pub const CACHE_TTL_SECONDS: u64 = CACHE_TTL_MS / 1000;

/// Default number of places held in the cache before eviction.
pub const DEFAULT_MAX_CACHED_PLACES: usize = 1000;

// ═══════════════════════════════════════════════════════════════════════════════
// UPSTREAM (GOOGLE PLACES)
// ═══════════════════════════════════════════════════════════════════════════════

/// Place details endpoint.
pub const PLACE_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";

/// Fields requested from the place details endpoint.
pub const REQUESTED_FIELDS: &str = "reviews,rating,user_ratings_total";

/// Template for the "leave a review" link. `{place_id}` is replaced verbatim.
pub const LEAVE_REVIEW_URL_TEMPLATE: &str =
    "https://search.google.com/local/writereview?placeid={place_id}";

/// Default outbound request timeout in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 30;

/// Upstream `status` values that carry no error on their own.
///
/// `ZERO_RESULTS` and `NOT_FOUND` come back without a `result` and are
/// reported as an invalid place rather than an API failure.
pub const NON_ERROR_UPSTREAM_STATUSES: &[&str] = &["OK", "ZERO_RESULTS", "NOT_FOUND"];

// ═══════════════════════════════════════════════════════════════════════════════
// HTTP SURFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// Query parameter carrying the place identifier.
pub const PLACE_ID_PARAM: &str = "placeId";

/// Message attached to a successful forced refresh.
pub const REFRESH_CONFIRMATION_MESSAGE: &str = "Cache updated successfully";

/// Plaintext body of the liveness route.
pub const LIVENESS_MESSAGE: &str = "Server Running";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;
