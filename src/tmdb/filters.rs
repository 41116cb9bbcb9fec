//! Discover filters
//!
//! Filter parameters for `/discover/movie`, kept in a sorted map so two
//! filter sets with the same contents always compare, hash and serialize
//! identically regardless of the order they were built in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const WITH_ORIGINAL_LANGUAGE: &str = "with_original_language";
pub const WITH_GENRES: &str = "with_genres";
pub const PRIMARY_RELEASE_YEAR: &str = "primary_release_year";
pub const WITH_WATCH_PROVIDERS: &str = "with_watch_providers";
pub const WATCH_REGION: &str = "watch_region";
pub const SORT_BY: &str = "sort_by";
pub const MIN_VOTE_COUNT: &str = "vote_count.gte";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscoverFilters(BTreeMap<String, String>);

impl DiscoverFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`. Blank values are ignored so an empty query
    /// string parameter never produces a distinct cache key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let value = value.trim();
        if !value.is_empty() {
            self.0.insert(key.into(), value.to_string());
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn language(self, code: &str) -> Self {
        self.with(WITH_ORIGINAL_LANGUAGE, code.to_lowercase())
    }

    /// Movies tagged with every genre in `ids`. Order and duplicates do not matter.
    pub fn genres(self, ids: &[u32]) -> Self {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        let joined = ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.with(WITH_GENRES, joined)
    }

    pub fn year(self, year: u16) -> Self {
        self.with(PRIMARY_RELEASE_YEAR, year.to_string())
    }

    pub fn provider(self, provider_id: u32, region: &str) -> Self {
        self.with(WITH_WATCH_PROVIDERS, provider_id.to_string())
            .with(WATCH_REGION, region.to_uppercase())
    }

    pub fn sort_by(self, order: &str) -> Self {
        self.with(SORT_BY, order)
    }

    pub fn min_vote_count(self, count: u32) -> Self {
        self.with(MIN_VOTE_COUNT, count.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Key/value pairs in key order, ready for a query string.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Canonical JSON form: keys sorted, values escaped.
    pub fn canonical(&self) -> String {
        let object: Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(object).to_string()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DiscoverFilters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Self::new();
        for (k, v) in iter {
            filters.insert(k, v);
        }
        filters
    }
}
