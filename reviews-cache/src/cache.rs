//! In-memory snapshot store keyed by place identifier.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use reviews_core::constants::{CACHE_TTL_MS, DEFAULT_MAX_CACHED_PLACES};
use reviews_core::traits::{Clock, SystemClock};
use reviews_core::types::{PlaceId, ReviewSnapshot};

/// Freshness of the cached snapshot for one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    /// Never fetched.
    Empty,
    /// Fetched within the TTL.
    Fresh,
    /// Fetched, TTL elapsed.
    Stale,
}

/// A committed snapshot and the time it was fetched.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedSnapshot {
    /// Snapshot as served to callers
    pub snapshot: ReviewSnapshot,
    /// When the upstream fetch that produced it completed
    pub last_fetched_at: DateTime<Utc>,
}

impl CachedSnapshot {
    fn is_fresh_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.last_fetched_at) < ttl
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Snapshot time-to-live in milliseconds
    pub ttl_ms: u64,
    /// Maximum number of places held at once
    pub max_entries: usize,
}

impl CacheConfig {
    /// Creates a config with the given TTL in seconds.
    pub fn with_ttl_seconds(mut self, seconds: u64) -> Self {
        self.ttl_ms = seconds.saturating_mul(1000);
        self
    }

    /// Sets the maximum number of cached places.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    fn ttl(&self) -> Duration {
        Duration::milliseconds(i64::try_from(self.ttl_ms).unwrap_or(i64::MAX))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: CACHE_TTL_MS,
            max_entries: DEFAULT_MAX_CACHED_PLACES,
        }
    }
}

/// Snapshot store shared by the controller.
///
/// Thread-safe. Each place's entry is replaced as a whole on commit, so a
/// reader sees either the previous snapshot or the new one, never a mix.
pub struct CacheStore {
    entries: RwLock<HashMap<PlaceId, CachedSnapshot>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    /// Creates a store with default configuration and the system clock.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default(), Arc::new(SystemClock))
    }

    /// Creates a store with custom configuration and clock.
    pub fn with_config(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
            clock,
        }
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.config.ttl()
    }

    /// Returns the current time according to the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Evaluates freshness for `place` at the current time.
    pub fn freshness(&self, place: &PlaceId) -> Freshness {
        let now = self.clock.now();
        match self.entries.read().get(place) {
            None => Freshness::Empty,
            Some(entry) if entry.is_fresh_at(now, self.ttl()) => Freshness::Fresh,
            Some(_) => Freshness::Stale,
        }
    }

    /// Returns the snapshot for `place` if it is still fresh.
    pub fn get_fresh(&self, place: &PlaceId) -> Option<ReviewSnapshot> {
        let now = self.clock.now();
        let entries = self.entries.read();
        entries
            .get(place)
            .filter(|e| e.is_fresh_at(now, self.ttl()))
            .map(|e| e.snapshot.clone())
    }

    /// Returns the entry for `place`, stale or not.
    pub fn get(&self, place: &PlaceId) -> Option<CachedSnapshot> {
        self.entries.read().get(place).cloned()
    }

    /// Returns when `place` was last fetched.
    pub fn last_fetched_at(&self, place: &PlaceId) -> Option<DateTime<Utc>> {
        self.entries.read().get(place).map(|e| e.last_fetched_at)
    }

    /// Replaces the snapshot for `place`, stamping it with the current time.
    ///
    /// Only call this with the result of a successful upstream fetch.
    pub fn commit(&self, place: &PlaceId, snapshot: ReviewSnapshot) -> CachedSnapshot {
        let now = self.clock.now();
        let ttl = self.ttl();
        let entry = CachedSnapshot {
            snapshot,
            last_fetched_at: now,
        };

        let mut entries = self.entries.write();

        if !entries.contains_key(place) && entries.len() >= self.config.max_entries {
            entries.retain(|_, e| e.is_fresh_at(now, ttl));

            if entries.len() >= self.config.max_entries {
                if let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.last_fetched_at)
                    .map(|(k, _)| k.clone())
                {
                    debug!(place = %oldest, "Evicting oldest snapshot");
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(place.clone(), entry.clone());
        entry
    }

    /// Removes the entry for `place`.
    pub fn remove(&self, place: &PlaceId) {
        self.entries.write().remove(place);
    }

    /// Clears all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Removes all stale entries.
    pub fn cleanup_expired(&self) {
        let now = self.clock.now();
        let ttl = self.ttl();
        self.entries.write().retain(|_, e| e.is_fresh_at(now, ttl));
    }

    /// Returns the number of cached places.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing has been cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let ttl = self.ttl();
        let entries = self.entries.read();
        let stale = entries.values().filter(|e| !e.is_fresh_at(now, ttl)).count();
        CacheStats {
            total_entries: entries.len(),
            stale_entries: stale,
            fresh_entries: entries.len().saturating_sub(stale),
            capacity: self.config.max_entries,
            ttl_ms: self.config.ttl_ms,
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Serialize)]
pub struct CacheStats {
    /// Places currently cached
    pub total_entries: usize,
    /// Entries at or past the TTL
    pub stale_entries: usize,
    /// Entries still within the TTL
    pub fresh_entries: usize,
    /// Maximum number of cached places
    pub capacity: usize,
    /// Configured TTL in milliseconds
    pub ttl_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviews_core::traits::ManualClock;
    use reviews_core::types::Review;

    fn place(id: &str) -> PlaceId {
        PlaceId::parse(Some(id)).unwrap()
    }

    fn snapshot(id: &str, total: u64) -> ReviewSnapshot {
        ReviewSnapshot::new(
            &place(id),
            vec![Review(serde_json::json!({"author_name": "Ada", "rating": 5}))],
            Some(total),
            Some(4.5),
        )
    }

    fn store_with_clock() -> (CacheStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let store = CacheStore::with_config(CacheConfig::default(), clock.clone());
        (store, clock)
    }

    #[test]
    fn test_empty_until_commit() {
        let (store, _) = store_with_clock();
        let p = place("place123");
        assert_eq!(store.freshness(&p), Freshness::Empty);
        assert!(store.get_fresh(&p).is_none());
        assert!(store.last_fetched_at(&p).is_none());
    }

    #[test]
    fn test_commit_makes_fresh() {
        let (store, clock) = store_with_clock();
        let p = place("place123");
        let committed = store.commit(&p, snapshot("place123", 10));

        assert_eq!(committed.last_fetched_at, clock.now());
        assert_eq!(store.freshness(&p), Freshness::Fresh);
        assert_eq!(store.get_fresh(&p).unwrap().total_reviews, 10);
    }

    #[test]
    fn test_fresh_within_ttl() {
        let (store, clock) = store_with_clock();
        let p = place("place123");
        store.commit(&p, snapshot("place123", 10));

        clock.advance(Duration::hours(1));
        assert_eq!(store.freshness(&p), Freshness::Fresh);

        clock.advance(Duration::hours(22) + Duration::minutes(59));
        assert_eq!(store.freshness(&p), Freshness::Fresh);
    }

    #[test]
    fn test_stale_at_ttl_boundary() {
        let (store, clock) = store_with_clock();
        let p = place("place123");
        store.commit(&p, snapshot("place123", 10));

        clock.advance(Duration::milliseconds(CACHE_TTL_MS as i64 - 1));
        assert_eq!(store.freshness(&p), Freshness::Fresh);

        clock.advance(Duration::milliseconds(1));
        assert_eq!(store.freshness(&p), Freshness::Stale);
        assert!(store.get_fresh(&p).is_none());
        // Stale entries stay readable
        assert!(store.get(&p).is_some());
    }

    #[test]
    fn test_places_are_isolated() {
        let (store, _) = store_with_clock();
        store.commit(&place("a"), snapshot("a", 1));
        store.commit(&place("b"), snapshot("b", 2));

        assert_eq!(store.get_fresh(&place("a")).unwrap().total_reviews, 1);
        assert_eq!(store.get_fresh(&place("b")).unwrap().total_reviews, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_commit_replaces_whole_entry() {
        let (store, clock) = store_with_clock();
        let p = place("place123");
        store.commit(&p, snapshot("place123", 10));
        clock.advance(Duration::hours(2));
        store.commit(&p, snapshot("place123", 11));

        let entry = store.get(&p).unwrap();
        assert_eq!(entry.snapshot.total_reviews, 11);
        assert_eq!(entry.last_fetched_at, clock.now());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let clock = Arc::new(ManualClock::default());
        let config = CacheConfig::default().with_max_entries(2);
        let store = CacheStore::with_config(config, clock.clone());

        store.commit(&place("a"), snapshot("a", 1));
        clock.advance(Duration::seconds(1));
        store.commit(&place("b"), snapshot("b", 2));
        clock.advance(Duration::seconds(1));
        store.commit(&place("c"), snapshot("c", 3));

        assert_eq!(store.len(), 2);
        assert!(store.get(&place("a")).is_none());
        assert!(store.get(&place("c")).is_some());
    }

    #[test]
    fn test_capacity_prefers_stale_eviction() {
        let clock = Arc::new(ManualClock::default());
        let config = CacheConfig::default().with_ttl_seconds(60).with_max_entries(2);
        let store = CacheStore::with_config(config, clock.clone());

        store.commit(&place("a"), snapshot("a", 1));
        clock.advance(Duration::seconds(30));
        store.commit(&place("b"), snapshot("b", 2));
        clock.advance(Duration::seconds(31));
        store.commit(&place("c"), snapshot("c", 3));

        assert!(store.get(&place("a")).is_none());
        assert!(store.get(&place("b")).is_some());
        assert!(store.get(&place("c")).is_some());
    }

    #[test]
    fn test_cleanup_expired() {
        let clock = Arc::new(ManualClock::default());
        let config = CacheConfig::default().with_ttl_seconds(60);
        let store = CacheStore::with_config(config, clock.clone());

        store.commit(&place("a"), snapshot("a", 1));
        clock.advance(Duration::seconds(61));
        store.commit(&place("b"), snapshot("b", 2));
        store.cleanup_expired();

        assert_eq!(store.len(), 1);
        assert!(store.get_fresh(&place("b")).is_some());
    }

    #[test]
    fn test_remove_and_clear() {
        let (store, _) = store_with_clock();
        store.commit(&place("a"), snapshot("a", 1));
        store.commit(&place("b"), snapshot("b", 2));

        store.remove(&place("a"));
        assert_eq!(store.freshness(&place("a")), Freshness::Empty);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_stats() {
        let (store, clock) = store_with_clock();
        store.commit(&place("a"), snapshot("a", 1));
        clock.advance(Duration::days(2));
        store.commit(&place("b"), snapshot("b", 2));

        let stats = store.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.stale_entries, 1);
        assert_eq!(stats.fresh_entries, 1);
        assert_eq!(stats.ttl_ms, CACHE_TTL_MS);
    }
}
