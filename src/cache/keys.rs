//! Cache keys and TTL policy
//!
//! One variant per logical upstream query. The `Display` form is the key in
//! the store: fixed-format fields first, free-form text last, so no two
//! distinct variants can render to the same string.

use std::fmt::Display;

use crate::tmdb::DiscoverFilters;

pub const TRENDING_TTL: u64 = 21_600; // 6 hours
pub const POPULAR_TTL: u64 = 43_200; // 12 hours
pub const TOP_RATED_TTL: u64 = 86_400; // 24 hours
pub const UPCOMING_TTL: u64 = 43_200; // 12 hours
pub const MOVIE_DETAIL_TTL: u64 = 86_400; // 24 hours
pub const SEARCH_TTL: u64 = 3_600; // 1 hour
pub const DISCOVER_TTL: u64 = 21_600; // 6 hours
pub const PROVIDERS_TTL: u64 = 86_400; // 24 hours
pub const GENRES_TTL: u64 = 604_800; // 1 week

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Trending { page: u32 },
    Popular { page: u32 },
    TopRated { page: u32 },
    Upcoming { page: u32 },
    MovieDetail(u64),
    Search { query: String, page: u32 },
    Discover { filters: DiscoverFilters, page: u32 },
    Providers(u64),
    Genres,
    Languages,
}

impl CacheKey {
    /// Builds a search key from raw user input.
    ///
    /// The query is trimmed, inner whitespace collapsed and lower-cased; the
    /// same normalized text must be what gets sent upstream.
    pub fn search(query: &str, page: u32) -> Self {
        CacheKey::Search {
            query: normalize_query(query),
            page,
        }
    }

    /// Lifetime of the cached payload in seconds. `None` never expires.
    pub fn ttl(&self) -> Option<u64> {
        let ttl = match self {
            CacheKey::Trending { .. } => TRENDING_TTL,
            CacheKey::Popular { .. } => POPULAR_TTL,
            CacheKey::TopRated { .. } => TOP_RATED_TTL,
            CacheKey::Upcoming { .. } => UPCOMING_TTL,
            CacheKey::MovieDetail(_) => MOVIE_DETAIL_TTL,
            CacheKey::Search { .. } => SEARCH_TTL,
            CacheKey::Discover { .. } => DISCOVER_TTL,
            CacheKey::Providers(_) => PROVIDERS_TTL,
            CacheKey::Genres => GENRES_TTL,
            CacheKey::Languages => return None,
        };
        Some(ttl)
    }

    /// Short operation name used in log fields.
    pub fn operation(&self) -> &'static str {
        match self {
            CacheKey::Trending { .. } => "trending",
            CacheKey::Popular { .. } => "popular",
            CacheKey::TopRated { .. } => "top_rated",
            CacheKey::Upcoming { .. } => "upcoming",
            CacheKey::MovieDetail(_) => "movie_detail",
            CacheKey::Search { .. } => "search",
            CacheKey::Discover { .. } => "discover",
            CacheKey::Providers(_) => "providers",
            CacheKey::Genres => "genres",
            CacheKey::Languages => "languages",
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Trending { page } => write!(f, "trending:page={}", page),
            CacheKey::Popular { page } => write!(f, "popular:page={}", page),
            CacheKey::TopRated { page } => write!(f, "top_rated:page={}", page),
            CacheKey::Upcoming { page } => write!(f, "upcoming:page={}", page),
            CacheKey::MovieDetail(id) => write!(f, "movie:{}", id),
            CacheKey::Search { query, page } => write!(f, "search:page={}:q={}", page, query),
            CacheKey::Discover { filters, page } => {
                write!(f, "discover:page={}:f={}", page, filters.canonical())
            }
            CacheKey::Providers(id) => write!(f, "providers:{}", id),
            CacheKey::Genres => write!(f, "genres"),
            CacheKey::Languages => write!(f, "config:languages"),
        }
    }
}

/// Trims, collapses runs of whitespace and lower-cases a search query.
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
