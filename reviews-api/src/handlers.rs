//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use reviews_core::constants::LIVENESS_MESSAGE;
use reviews_core::types::{RefreshConfirmation, ReviewSnapshot};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET /reviews?placeId=
pub async fn get_reviews(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<PlaceQuery>, QueryRejection>,
) -> Result<Json<ReviewSnapshot>> {
    let Query(query) = query?;
    let snapshot = state
        .controller
        .get_reviews(query.place_id.as_deref())
        .await?;

    Ok(Json(snapshot))
}

/// GET /refresh-reviews?placeId=
pub async fn refresh_reviews(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<PlaceQuery>, QueryRejection>,
) -> Result<Json<RefreshConfirmation>> {
    let Query(query) = query?;
    let confirmation = state
        .controller
        .force_refresh(query.place_id.as_deref())
        .await?;

    Ok(Json(confirmation))
}

/// GET /
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stats = state.controller.store().stats();

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        cached_places: stats.total_entries,
        fresh_places: stats.fresh_entries,
        cache_ttl_seconds: stats.ttl_ms / 1000,
    })
}
