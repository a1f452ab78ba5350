//! App state: review controller, config.

use std::sync::Arc;
use std::time::Instant;

use tracing::warn;

use reviews_controller::{CacheConfig, CacheStore, ReviewCacheController};
use reviews_core::constants::{
    CACHE_TTL_SECONDS, DEFAULT_MAX_CACHED_PLACES, DEFAULT_PORT, DEFAULT_UPSTREAM_TIMEOUT_SECONDS,
    PLACE_DETAILS_URL,
};
use reviews_core::error::Result;
use reviews_core::traits::{Clock, ReviewsUpstream, SystemClock};
use reviews_places::{PlacesClient, PlacesConfig};

/// Server configuration, normally read from the environment.
#[derive(Clone)]
pub struct ApiConfig {
    /// Places API key (`GOOGLE_API_KEY`)
    pub api_key: String,
    /// Place-details endpoint (`PLACES_API_URL`)
    pub places_url: String,
    /// Upstream request timeout (`PLACES_TIMEOUT_SECONDS`)
    pub upstream_timeout_seconds: u64,
    /// Snapshot TTL (`CACHE_TTL_SECONDS`)
    pub cache_ttl_seconds: u64,
    /// Cache capacity in places (`CACHE_MAX_PLACES`)
    pub max_cached_places: usize,
    /// Listen port (`PORT`)
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            places_url: PLACE_DETAILS_URL.into(),
            upstream_timeout_seconds: DEFAULT_UPSTREAM_TIMEOUT_SECONDS,
            cache_ttl_seconds: CACHE_TTL_SECONDS,
            max_cached_places: DEFAULT_MAX_CACHED_PLACES,
            port: DEFAULT_PORT,
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("places_url", &self.places_url)
            .field("upstream_timeout_seconds", &self.upstream_timeout_seconds)
            .field("cache_ttl_seconds", &self.cache_ttl_seconds)
            .field("max_cached_places", &self.max_cached_places)
            .field("port", &self.port)
            .finish()
    }
}

impl ApiConfig {
    /// Reads `.env` if present, then the process environment. Unset or
    /// unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Self {
            api_key: std::env::var("GOOGLE_API_KEY").unwrap_or_default(),
            places_url: std::env::var("PLACES_API_URL").unwrap_or(defaults.places_url),
            upstream_timeout_seconds: env_parse("PLACES_TIMEOUT_SECONDS")
                .unwrap_or(defaults.upstream_timeout_seconds),
            cache_ttl_seconds: env_parse("CACHE_TTL_SECONDS").unwrap_or(defaults.cache_ttl_seconds),
            max_cached_places: env_parse("CACHE_MAX_PLACES").unwrap_or(defaults.max_cached_places),
            port: env_parse("PORT").unwrap_or(defaults.port),
        }
    }

    /// Cache settings derived from this config.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default()
            .with_ttl_seconds(self.cache_ttl_seconds)
            .with_max_entries(self.max_cached_places)
    }

    /// Places client settings derived from this config.
    pub fn places_config(&self) -> PlacesConfig {
        PlacesConfig::new(self.api_key.clone())
            .with_base_url(self.places_url.clone())
            .with_timeout_seconds(self.upstream_timeout_seconds)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring unparsable environment value");
            None
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Effective configuration
    pub config: ApiConfig,
    /// Cache-fronted review lookups
    pub controller: ReviewCacheController,
    /// Construction time, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Builds state backed by the Places API.
    pub fn new(config: ApiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            warn!("GOOGLE_API_KEY is not set; upstream requests will be rejected");
        }
        let upstream = Arc::new(PlacesClient::with_config(config.places_config())?);
        Ok(Self::with_upstream(config, upstream, Arc::new(SystemClock)))
    }

    /// Builds state over any upstream and clock.
    pub fn with_upstream(
        config: ApiConfig,
        upstream: Arc<dyn ReviewsUpstream>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = CacheStore::with_config(config.cache_config(), clock);
        Self {
            controller: ReviewCacheController::new(upstream, store),
            config,
            started_at: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.cache_config().ttl_ms, 86_400_000);
        assert_eq!(config.places_config().base_url, PLACE_DETAILS_URL);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = ApiConfig {
            api_key: "super-secret".into(),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn test_env_parse() {
        std::env::set_var("REVIEWS_API_TEST_PORT", " 8080 ");
        std::env::set_var("REVIEWS_API_TEST_BAD", "eighty");
        assert_eq!(env_parse::<u16>("REVIEWS_API_TEST_PORT"), Some(8080));
        assert_eq!(env_parse::<u16>("REVIEWS_API_TEST_BAD"), None);
        assert_eq!(env_parse::<u16>("REVIEWS_API_TEST_UNSET"), None);
    }

    #[test]
    fn test_invalid_places_url_fails() {
        let config = ApiConfig {
            places_url: "::not-a-url::".into(),
            ..Default::default()
        };
        assert!(AppState::new(config).is_err());
    }
}
