//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness
        .route("/", get(handlers::liveness))
        .route("/health", get(handlers::health_check))

        // Reviews
        .route("/reviews", get(handlers::get_reviews))
        .route("/refresh-reviews", get(handlers::refresh_reviews))

        .with_state(state)
}
