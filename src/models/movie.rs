//! Movie list items as used by the recommendation heuristics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The fields of a TMDB list result the heuristics rank and filter on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub original_language: Option<String>,
}

impl MovieSummary {
    pub fn has_genre(&self, genre_id: u32) -> bool {
        self.genre_ids.contains(&genre_id)
    }
}

/// Extracts `results` from a paged list body, skipping malformed items.
pub fn movies_from_page(page: &Value) -> Vec<MovieSummary> {
    page.get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movies_from_page() {
        let page = json!({
            "page": 1,
            "results": [
                {"id": 278, "title": "The Shawshank Redemption", "vote_average": 8.7, "vote_count": 27000, "genre_ids": [18, 80], "poster_path": null},
                {"title": "missing id"},
                {"id": 238, "title": "The Godfather", "vote_average": 8.7, "vote_count": 20000}
            ]
        });

        let movies = movies_from_page(&page);
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 278);
        assert!(movies[0].has_genre(18));
        assert!(movies[0].poster_path.is_none());
        assert!(movies[1].genre_ids.is_empty());
    }

    #[test]
    fn test_movies_from_page_without_results() {
        assert!(movies_from_page(&json!({"status_message": "nope"})).is_empty());
    }
}
