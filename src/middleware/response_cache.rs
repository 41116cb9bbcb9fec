//! Response cache middleware
//!
//! Caches whole JSON responses of `GET` routes in the shared store under
//! `"{METHOD}_{URI}"`, independent of the per-operation service keys.
//! Only 2xx JSON bodies are stored; every response carries `x-cache`.
//!
//! Lookups here keep their own hit/miss counters so the store's statistics
//! describe the service layer alone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{OriginalUri, Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::SharedCache;
use crate::error::AppError;
use crate::models::ResponseTierStats;

pub const X_CACHE: &str = "x-cache";

/// Counters for the response tier.
///
/// A miss is only counted once the route produced a response worth
/// storing, so rejected or failed requests never show up as misses.
#[derive(Debug, Default)]
pub struct ResponseCacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCacheStats {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ResponseTierStats {
        ResponseTierStats::new(
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}

/// Middleware state: where to cache, for how long, and the tier's counters.
#[derive(Clone)]
pub struct ResponseCache {
    pub cache: SharedCache,
    pub ttl: u64,
    pub stats: Arc<ResponseCacheStats>,
}

impl ResponseCache {
    pub fn new(cache: SharedCache, ttl: u64) -> Self {
        Self {
            cache,
            ttl,
            stats: Arc::new(ResponseCacheStats::default()),
        }
    }
}

/// Store key for a request. Uses the URI as the client sent it, before any
/// router nesting stripped its prefix.
pub fn response_cache_key(request: &Request) -> String {
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.to_string())
        .unwrap_or_else(|| request.uri().to_string());
    format!("{}_{}", request.method(), uri)
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn tag(mut response: Response, value: &'static str) -> Response {
    response
        .headers_mut()
        .insert(X_CACHE, HeaderValue::from_static(value));
    response
}

pub async fn response_cache(
    State(state): State<ResponseCache>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = response_cache_key(&request);

    // Expired entries are left for the sweep
    let hit = state.cache.read().await.peek(&key);
    if let Some(body) = hit {
        debug!(key = %key, "Response cache hit");
        state.stats.record_hit();
        return tag(Json(body).into_response(), "HIT");
    }

    let response = next.run(request).await;
    if !response.status().is_success() || !is_json(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return AppError::Internal(format!("buffering response body: {}", e)).into_response()
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => {
            state.cache.write().await.set(key, value, Some(state.ttl));
            state.stats.record_miss();
        }
        Err(e) => warn!(key = %key, error = %e, "Response body is not valid JSON, not cached"),
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    tag(Response::from_parts(parts, Body::from(bytes)), "MISS")
}
