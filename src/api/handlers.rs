//! API Handlers
//!
//! Movie metadata endpoints. Each one validates its input, asks the
//! cache-aside service and wraps the upstream body in the success envelope.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{ApiResponse, BrowseQuery, HealthResponse, PageQuery, SearchQuery};

type JsonResult = AppResult<Json<ApiResponse<Value>>>;

fn ok(body: Value) -> JsonResult {
    Ok(Json(ApiResponse::ok(body)))
}

/// Parses a path id; must be a positive integer.
pub(crate) fn parse_id(raw: &str, what: &str) -> AppResult<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation(format!("Invalid {} id", what)))
}

/// GET /api/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /api/movies/trending
pub async fn trending_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> JsonResult {
    ok(state.movies.trending(query.page()?).await?)
}

/// GET /api/movies/popular
pub async fn popular_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> JsonResult {
    ok(state.movies.popular(query.page()?).await?)
}

/// GET /api/movies/top-rated
pub async fn top_rated_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> JsonResult {
    ok(state.movies.top_rated(query.page()?).await?)
}

/// GET /api/movies/upcoming
pub async fn upcoming_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> JsonResult {
    ok(state.movies.upcoming(query.page()?).await?)
}

/// GET /api/movies/search?query=..
pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> JsonResult {
    let text = query.query()?;
    let page = query.page()?;
    ok(state.movies.search(text, page).await?)
}

/// GET /api/movies/browse
pub async fn browse_handler(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> JsonResult {
    let filters = query.filters()?;
    let page = query.page()?;
    ok(state.movies.browse(&filters, page).await?)
}

/// GET /api/movies/:id
pub async fn movie_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> JsonResult {
    let id = parse_id(&id, "movie")?;
    ok(state.movies.movie_detail(id).await?)
}

/// GET /api/providers/:id
pub async fn providers_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> JsonResult {
    let id = parse_id(&id, "movie")?;
    ok(state.movies.providers(id).await?)
}

/// GET /api/genres
pub async fn genres_handler(State(state): State<AppState>) -> JsonResult {
    ok(state.movies.genres().await?)
}

/// GET /api/config/languages
pub async fn languages_handler(State(state): State<AppState>) -> JsonResult {
    ok(state.movies.languages().await?)
}

/// Fallback for unmatched routes.
pub async fn not_found_handler() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
