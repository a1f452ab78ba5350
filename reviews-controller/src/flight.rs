//! Per-place locks so concurrent misses share one upstream call.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use reviews_core::types::PlaceId;

/// Table of in-flight fetches, one async mutex per place.
///
/// Entries are removed as soon as the last holder or waiter lets go, so the
/// table only ever contains places with a fetch in progress.
#[derive(Default)]
pub struct FlightLocks {
    locks: DashMap<PlaceId, Arc<Mutex<()>>>,
}

impl FlightLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other fetch for `place` is in flight, then claims it.
    pub async fn acquire(&self, place: &PlaceId) -> FlightGuard<'_> {
        let lock = Arc::clone(self.locks.entry(place.clone()).or_default().value());
        let guard = lock.lock_owned().await;
        FlightGuard {
            locks: &self.locks,
            place: place.clone(),
            guard: Some(guard),
        }
    }

    /// Number of places with a fetch in flight or queued.
    pub fn in_flight(&self) -> usize {
        self.locks.len()
    }
}

/// Exclusive claim on fetching one place.
pub struct FlightGuard<'a> {
    locks: &'a DashMap<PlaceId, Arc<Mutex<()>>>,
    place: PlaceId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        // Release the mutex first so the table holds the only reference when idle.
        drop(self.guard.take());
        self.locks
            .remove_if(&self.place, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn place(id: &str) -> PlaceId {
        PlaceId::parse(Some(id)).unwrap()
    }

    #[tokio::test]
    async fn test_guard_cleans_up() {
        let locks = FlightLocks::new();
        {
            let _guard = locks.acquire(&place("a")).await;
            assert_eq!(locks.in_flight(), 1);
        }
        assert_eq!(locks.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_same_place_is_exclusive() {
        let locks = Arc::new(FlightLocks::new());
        let first = locks.acquire(&place("a")).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&place("a")).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(first);
        waiter.await.unwrap();
        assert_eq!(locks.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_different_places_do_not_block() {
        let locks = FlightLocks::new();
        let _a = locks.acquire(&place("a")).await;
        let _b = locks.acquire(&place("b")).await;
        assert_eq!(locks.in_flight(), 2);
    }
}
