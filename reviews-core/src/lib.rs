//! # Reviews Core
//!
//! Core types, errors, and traits for the place reviews proxy.
//!
//! This crate provides the building blocks shared by the other workspace crates:
//!
//! - **Types**: place identifiers, opaque reviews, and the cached snapshot payload
//! - **Errors**: the upstream and controller error taxonomy
//! - **Constants**: TTL, upstream endpoint, and URL templates
//! - **Traits**: the upstream seam and an injectable clock
//!
//! ## Example
//!
//! ```rust
//! use reviews_core::PlaceId;
//!
//! let place = PlaceId::parse(Some("place123")).unwrap();
//! assert_eq!(
//!     place.leave_review_url(),
//!     "https://search.google.com/local/writereview?placeid=place123"
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{ErrorKind, Result, ReviewsError, UpstreamError};
pub use traits::*;
pub use types::*;
