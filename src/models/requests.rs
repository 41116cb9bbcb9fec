//! Request DTOs
//!
//! Query strings are deserialized as raw strings and validated here, so a
//! malformed parameter yields the JSON error envelope instead of axum's
//! plain-text rejection.

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::tmdb::DiscoverFilters;

/// TMDB refuses pages past 500.
pub const MAX_PAGE: u32 = 500;

pub const DEFAULT_PRESERVED: usize = 3;
pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

fn parse_bounded<T>(raw: Option<&str>, default: T, min: T, max: T, message: &str) -> AppResult<T>
where
    T: std::str::FromStr + PartialOrd + Copy,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s
            .parse::<T>()
            .ok()
            .filter(|v| *v >= min && *v <= max)
            .ok_or_else(|| AppError::Validation(message.to_string())),
    }
}

fn parse_page(raw: Option<&str>) -> AppResult<u32> {
    parse_bounded(
        raw,
        1,
        1,
        MAX_PAGE,
        "Page must be an integer between 1 and 500",
    )
}

/// Parses a comma separated list of positive ids, ignoring blanks.
pub fn parse_id_list(raw: Option<&str>, field: &str) -> AppResult<Vec<u64>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| AppError::Validation(format!("Invalid id in {}: {}", field, s)))
        })
        .collect()
}

/// Query for the paged list routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> AppResult<u32> {
        parse_page(self.page.as_deref())
    }
}

/// Query for `GET /api/movies/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub page: Option<String>,
}

impl SearchQuery {
    pub fn query(&self) -> AppResult<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::Validation("Search query is required".to_string()))
    }

    pub fn page(&self) -> AppResult<u32> {
        parse_page(self.page.as_deref())
    }
}

/// Query for `GET /api/movies/browse`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    pub with_original_language: Option<String>,
    pub with_genres: Option<String>,
    pub year: Option<String>,
    pub page: Option<String>,
}

impl BrowseQuery {
    pub fn page(&self) -> AppResult<u32> {
        parse_page(self.page.as_deref())
    }

    /// Converts the query into discover filters; empty when nothing is set.
    pub fn filters(&self) -> AppResult<DiscoverFilters> {
        let mut filters = DiscoverFilters::new();

        if let Some(language) = self.with_original_language.as_deref() {
            let language = language.trim().to_ascii_lowercase();
            if !language.is_empty() && !language.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(AppError::Validation(
                    "with_original_language must be a language code".to_string(),
                ));
            }
            filters = filters.language(&language);
        }

        if let Some(genres) = self.with_genres.as_deref() {
            let ids = genres
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<u32>().map_err(|_| {
                        AppError::Validation(format!("Invalid genre id: {}", s))
                    })
                })
                .collect::<AppResult<Vec<u32>>>()?;
            filters = filters.genres(&ids);
        }

        if let Some(year) = self.year.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let year = year
                .parse::<u16>()
                .ok()
                .filter(|y| (1870..=2100).contains(y))
                .ok_or_else(|| AppError::Validation("Year must be a valid year".to_string()))?;
            filters = filters.year(year);
        }

        Ok(filters)
    }
}

/// Query for `GET /api/recommendations/shuffle`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShuffleQuery {
    pub preserved: Option<String>,
    pub limit: Option<String>,
    pub exclude: Option<String>,
}

impl ShuffleQuery {
    pub fn preserved(&self) -> AppResult<usize> {
        parse_bounded(
            self.preserved.as_deref(),
            DEFAULT_PRESERVED,
            0,
            MAX_LIMIT,
            "preserved must be an integer between 0 and 100",
        )
    }

    pub fn limit(&self) -> AppResult<usize> {
        parse_bounded(
            self.limit.as_deref(),
            DEFAULT_LIMIT,
            1,
            MAX_LIMIT,
            "limit must be an integer between 1 and 100",
        )
    }

    pub fn exclude(&self) -> AppResult<Vec<u64>> {
        parse_id_list(self.exclude.as_deref(), "exclude")
    }
}

/// Query for `GET /api/recommendations/mood`.
///
/// `genres` is a comma separated list of genre names or ids; `language` is
/// a language name or ISO 639-1 code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoodQuery {
    pub mood: Option<String>,
    pub genres: Option<String>,
    pub language: Option<String>,
    pub exclude: Option<String>,
}

impl MoodQuery {
    pub fn mood(&self) -> AppResult<&str> {
        self.mood
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AppError::Validation("Mood is required".to_string()))
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres
            .as_deref()
            .map(|g| {
                g.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn exclude(&self) -> AppResult<Vec<u64>> {
        parse_id_list(self.exclude.as_deref(), "exclude")
    }
}
