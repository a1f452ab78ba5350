//! TTL snapshot store for place reviews.
//!
//! Freshness is evaluated lazily on every read; nothing runs in the background.

mod cache;

pub use cache::{CacheConfig, CacheStats, CacheStore, CachedSnapshot, Freshness};
