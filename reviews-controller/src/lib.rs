//! # Review Cache Controller
//!
//! Serves cached review snapshots while they are fresh and refills them from
//! the upstream otherwise.
//!
//! ```rust,ignore
//! use reviews_controller::ReviewCacheController;
//!
//! let controller = ReviewCacheController::new(upstream, CacheStore::new());
//! let snapshot = controller.get_reviews(Some("place123")).await?;
//! let confirmation = controller.force_refresh(Some("place123")).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod controller;
mod flight;

pub use controller::ReviewCacheController;
pub use flight::{FlightGuard, FlightLocks};
pub use reviews_cache::{CacheConfig, CacheStats, CacheStore, CachedSnapshot, Freshness};
