//! Domain types for the reviews proxy.
//!
//! - [`PlaceId`]: validated place identifier
//! - [`Review`]: opaque review record passed through from upstream
//! - [`ReviewSnapshot`]: reviews plus aggregate rating and the review link
//! - [`RefreshConfirmation`]: a snapshot wrapped with a confirmation message

mod place;
mod review;

pub use place::*;
pub use review::*;
