//! TMDB upstream access
//!
//! `MovieProvider` is the seam between the cache-aside service layer and the
//! metadata provider. `TmdbClient` is the HTTP implementation; tests plug in
//! their own providers.

use async_trait::async_trait;
use serde_json::Value;

mod client;
mod error;
mod filters;

pub use client::{TmdbClient, TmdbConfig};
pub use error::{UpstreamError, UpstreamResult};
pub use filters::DiscoverFilters;
pub use filters::{
    MIN_VOTE_COUNT, PRIMARY_RELEASE_YEAR, SORT_BY, WATCH_REGION, WITH_GENRES,
    WITH_ORIGINAL_LANGUAGE, WITH_WATCH_PROVIDERS,
};

/// Sub-resources fetched together with a movie's details.
pub const DETAIL_APPEND: &str = "credits,videos,similar,recommendations";

/// Read-only operations against the metadata provider.
///
/// Every method returns the provider's JSON body untouched.
#[async_trait]
pub trait MovieProvider: Send + Sync {
    /// Weekly trending movies
    async fn trending(&self, page: u32) -> UpstreamResult<Value>;

    async fn popular(&self, page: u32) -> UpstreamResult<Value>;

    async fn top_rated(&self, page: u32) -> UpstreamResult<Value>;

    async fn upcoming(&self, page: u32) -> UpstreamResult<Value>;

    /// Movie details with credits, videos, similar titles and recommendations
    async fn movie_detail(&self, id: u64) -> UpstreamResult<Value>;

    /// Free-text title search. `query` is sent exactly as given.
    async fn search(&self, query: &str, page: u32) -> UpstreamResult<Value>;

    /// Filtered discovery (language, genres, year, provider, ordering)
    async fn discover(&self, filters: &DiscoverFilters, page: u32) -> UpstreamResult<Value>;

    /// Watch providers (streaming, rent, buy) per region for one movie
    async fn providers(&self, id: u64) -> UpstreamResult<Value>;

    /// Movie genre taxonomy
    async fn genres(&self) -> UpstreamResult<Value>;

    /// ISO 639-1 languages known to the provider
    async fn languages(&self) -> UpstreamResult<Value>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
