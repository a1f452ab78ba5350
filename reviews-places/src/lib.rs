//! Google Places client for the reviews proxy.
//!
//! Issues one place-details request per fetch and classifies every failure
//! into an [`UpstreamError`](reviews_core::UpstreamError).

mod client;

pub use client::{PlacesClient, PlacesConfig};
