//! Cache administration endpoints (admin only)

use axum::{extract::State, Json};
use tracing::info;

use super::AppState;
use crate::middleware::AdminClaims;
use crate::models::{ApiResponse, FlushResponse, StatsResponse};

/// GET /api/admin/cache/stats
pub async fn cache_stats_handler(
    _admin: AdminClaims,
    State(state): State<AppState>,
) -> Json<ApiResponse<StatsResponse>> {
    let store = state.cache.read().await.stats();
    let response_cache = state.response_cache.stats.snapshot();
    Json(ApiResponse::ok(StatsResponse::new(store, response_cache)))
}

/// DELETE /api/admin/cache
pub async fn flush_cache_handler(
    AdminClaims(claims): AdminClaims,
    State(state): State<AppState>,
) -> Json<ApiResponse<FlushResponse>> {
    let flushed = state.cache.write().await.flush();
    info!(admin = %claims.sub, flushed, "Cache flushed");
    Json(ApiResponse::ok(FlushResponse { flushed }))
}
