//! API Routes
//!
//! Builds the router: everything lives under `/api`, movie metadata routes
//! sit behind the response cache, and the whole API is rate limited.

use std::any::Any as PanicPayload;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

use super::admin::{cache_stats_handler, flush_cache_handler};
use super::dmca::{complaints_handler, submit_handler};
use super::handlers::*;
use super::recommendations::{mood_handler, shuffle_handler};
use super::AppState;
use crate::error::AppError;
use crate::middleware::{
    error_detail::error_detail,
    rate_limit::rate_limit,
    request_id::{make_span_with_request_id, request_id},
    response_cache::response_cache,
};

/// CORS from the configured origins. `*` allows any origin without
/// credentials; otherwise only the listed origins, with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Turns a panic anywhere below the router into the generic 500.
fn panic_response(panic: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(panic = %detail, "Request handler panicked");
    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// Creates the main router with all endpoints configured.
pub fn create_router(state: AppState) -> Router {
    let cached = Router::new()
        .route("/movies/trending", get(trending_handler))
        .route("/movies/popular", get(popular_handler))
        .route("/movies/top-rated", get(top_rated_handler))
        .route("/movies/upcoming", get(upcoming_handler))
        .route("/movies/search", get(search_handler))
        .route("/movies/browse", get(browse_handler))
        .route("/movies/:id", get(movie_detail_handler))
        .route("/providers/:id", get(providers_handler))
        .route("/genres", get(genres_handler))
        .route_layer(from_fn_with_state(state.response_cache.clone(), response_cache));

    let api = Router::new()
        .route("/health", get(health_handler))
        .merge(cached)
        .route("/config/languages", get(languages_handler))
        .route("/recommendations/shuffle", get(shuffle_handler))
        .route("/recommendations/mood", get(mood_handler))
        .route("/dmca/submit", post(submit_handler))
        .route("/dmca/complaints", get(complaints_handler))
        .route("/admin/cache/stats", get(cache_stats_handler))
        .route("/admin/cache", delete(flush_cache_handler))
        .route_layer(from_fn_with_state(state.limiter.clone(), rate_limit));

    let mut app = Router::new()
        .nest("/api", api)
        .fallback(not_found_handler)
        .layer(CatchPanicLayer::custom(panic_response));

    if state.config.is_development() {
        app = app.layer(from_fn(error_detail));
    }

    app.layer(cors_layer(&state.config.cors_origins))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(from_fn(request_id))
        .with_state(state)
}
