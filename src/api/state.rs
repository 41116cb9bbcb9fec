//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;

use crate::cache::{shared, CacheStore, SharedCache};
use crate::config::Config;
use crate::middleware::{ClientRateLimiter, JwtAuth, ResponseCache};
use crate::services::{DmcaStore, MovieService};
use crate::tmdb::{MovieProvider, TmdbClient};

#[derive(Clone)]
pub struct AppState {
    /// Store shared by the service layer, the response cache and the sweep
    pub cache: SharedCache,
    pub movies: Arc<MovieService>,
    /// Whole-response tier over the same store
    pub response_cache: ResponseCache,
    pub dmca: DmcaStore,
    pub auth: Arc<JwtAuth>,
    pub limiter: Arc<ClientRateLimiter>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the state around an existing provider and store.
    pub fn new(config: Config, provider: Arc<dyn MovieProvider>, cache: SharedCache) -> Self {
        let movies = Arc::new(MovieService::new(provider, cache.clone()));
        let response_cache = ResponseCache::new(cache.clone(), config.response_cache_ttl);
        let auth = Arc::new(JwtAuth::new(&config.jwt_secret, config.jwt_issuer.clone()));
        let limiter = Arc::new(ClientRateLimiter::new(
            config.rate_limit_max_requests,
            Duration::from_secs(config.rate_limit_window),
        ));

        Self {
            cache,
            movies,
            response_cache,
            dmca: DmcaStore::new(),
            auth,
            limiter,
            config: Arc::new(config),
        }
    }

    /// Builds the production state: TMDB client plus a wall-clock store.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = TmdbClient::new(config.tmdb_config())?;
        let cache = shared(CacheStore::new(config.default_ttl));
        Ok(Self::new(config, Arc::new(client), cache))
    }
}

impl FromRef<AppState> for Arc<JwtAuth> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
