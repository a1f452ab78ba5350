//! Fetch-or-serve decisions over the snapshot store.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use reviews_cache::{CacheStore, Freshness};
use reviews_core::error::{Result, ReviewsError, UpstreamError};
use reviews_core::traits::ReviewsUpstream;
use reviews_core::types::{PlaceId, RefreshConfirmation, ReviewSnapshot};

use crate::flight::FlightLocks;

/// Review cache controller.
///
/// Owns the snapshot store and decides, per request, whether to serve the
/// cached snapshot or go to the upstream:
///
/// 1. Validate the place identifier
/// 2. Serve the cached snapshot if it is fresh
/// 3. Otherwise claim the place's flight lock, re-check, and fetch
/// 4. Commit only a successful result; failures leave the store untouched
pub struct ReviewCacheController {
    upstream: Arc<dyn ReviewsUpstream>,
    store: CacheStore,
    flights: FlightLocks,
}

impl ReviewCacheController {
    /// Creates a controller over the given upstream and store.
    pub fn new(upstream: Arc<dyn ReviewsUpstream>, store: CacheStore) -> Self {
        Self {
            upstream,
            store,
            flights: FlightLocks::new(),
        }
    }

    /// Returns reviews for a place, from cache while fresh.
    ///
    /// Fails with [`ReviewsError::MissingParameter`] for an absent or empty id
    /// and with [`ReviewsError::FetchFailed`] when the upstream call fails.
    #[instrument(skip(self))]
    pub async fn get_reviews(&self, place_id: Option<&str>) -> Result<ReviewSnapshot> {
        let place = PlaceId::parse(place_id)?;

        if let Some(snapshot) = self.store.get_fresh(&place) {
            debug!(place = %place, "Serving reviews from cache");
            return Ok(snapshot);
        }

        let _flight = self.flights.acquire(&place).await;

        // Another caller may have filled the entry while we waited.
        if let Some(snapshot) = self.store.get_fresh(&place) {
            debug!(place = %place, "Serving reviews fetched by concurrent request");
            return Ok(snapshot);
        }

        info!(place = %place, freshness = ?self.store.freshness(&place), "Fetching new reviews");
        let snapshot = self
            .fetch_and_commit(&place)
            .await
            .map_err(ReviewsError::FetchFailed)?;

        Ok(snapshot)
    }

    /// Refetches reviews for a place regardless of freshness.
    ///
    /// Fails with [`ReviewsError::MissingParameter`] for an absent or empty id
    /// and with [`ReviewsError::RefreshFailed`] when the upstream call fails.
    #[instrument(skip(self))]
    pub async fn force_refresh(&self, place_id: Option<&str>) -> Result<RefreshConfirmation> {
        let place = PlaceId::parse(place_id)?;

        let _flight = self.flights.acquire(&place).await;

        info!(place = %place, "Manually refreshing reviews");
        let snapshot = self
            .fetch_and_commit(&place)
            .await
            .map_err(ReviewsError::RefreshFailed)?;

        Ok(RefreshConfirmation::new(snapshot))
    }

    /// Freshness of the cached snapshot for a place.
    pub fn freshness(&self, place: &PlaceId) -> Freshness {
        self.store.freshness(place)
    }

    /// The underlying snapshot store.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    async fn fetch_and_commit(
        &self,
        place: &PlaceId,
    ) -> std::result::Result<ReviewSnapshot, UpstreamError> {
        match self.upstream.fetch_reviews(place).await {
            Ok(snapshot) => {
                let committed = self.store.commit(place, snapshot);
                info!(
                    place = %place,
                    reviews = committed.snapshot.len(),
                    fetched_at = %committed.last_fetched_at,
                    "Cache updated"
                );
                Ok(committed.snapshot)
            }
            Err(e) => {
                warn!(place = %place, kind = %e.kind(), error = %e, "Upstream fetch failed, cache left unchanged");
                Err(e)
            }
        }
    }
}
