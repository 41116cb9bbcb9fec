//! Recommendation endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use rand::{rngs::StdRng, SeedableRng};

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{movies_from_page, ApiResponse, ListResponse, MoodQuery, MovieSummary, ShuffleQuery};
use crate::services::recommend::{
    genre_id, language_code, merge_candidates, rank_and_partially_shuffle, recommend_for_mood,
    Mood, MoodSelection, ScoredMovie, ShuffleWeights,
};
use crate::tmdb::DiscoverFilters;

/// Discover ordering and floor for mood candidates.
const MOOD_ORDER: &str = "vote_average.desc";
const MOOD_MIN_VOTES: u32 = 50;
/// Deeper result pages give more varied candidates; a repeat request
/// (something excluded) looks further down.
const MOOD_PAGE: u32 = 3;
const MOOD_RETRY_PAGE: u32 = 5;

/// GET /api/recommendations/shuffle
///
/// Top rated and most reviewed movies merged and ranked; the best
/// `preserved` stay on top and the rest is shuffled.
pub async fn shuffle_handler(
    State(state): State<AppState>,
    Query(query): Query<ShuffleQuery>,
) -> AppResult<Json<ListResponse<ScoredMovie>>> {
    let preserved = query.preserved()?;
    let limit = query.limit()?;
    let exclude = query.exclude()?;

    let (top_rated, top_reviewed) =
        tokio::join!(state.movies.top_rated(1), state.movies.top_reviewed(1));
    let merged = merge_candidates(
        movies_from_page(&top_rated?),
        movies_from_page(&top_reviewed?),
        ShuffleWeights::default(),
    );

    // Everything excluded: start over with the full list.
    let remaining: Vec<ScoredMovie> = merged
        .iter()
        .filter(|s| !exclude.contains(&s.movie.id))
        .cloned()
        .collect();
    let candidates = if remaining.is_empty() { merged } else { remaining };

    let mut rng = StdRng::from_entropy();
    let mut ranked = rank_and_partially_shuffle(candidates, preserved, |_, s| s.score, &mut rng);
    ranked.truncate(limit);

    Ok(Json(ListResponse::ok(ranked)))
}

fn mood_selection(query: &MoodQuery) -> AppResult<MoodSelection> {
    let mood = query
        .mood()?
        .parse::<Mood>()
        .map_err(AppError::Validation)?;

    let genre_ids = query
        .genre_names()
        .into_iter()
        .map(|name| {
            genre_id(name).ok_or_else(|| AppError::Validation(format!("Unknown genre: {}", name)))
        })
        .collect::<AppResult<Vec<u32>>>()?;

    Ok(MoodSelection { mood, genre_ids })
}

/// GET /api/recommendations/mood
///
/// The single best movie for a mood, genre and language selection.
pub async fn mood_handler(
    State(state): State<AppState>,
    Query(query): Query<MoodQuery>,
) -> AppResult<Json<ApiResponse<MovieSummary>>> {
    let selection = mood_selection(&query)?;
    let exclude = query.exclude()?;

    let mut filters = DiscoverFilters::new()
        .sort_by(MOOD_ORDER)
        .min_vote_count(MOOD_MIN_VOTES);
    if let Some(language) = query.language.as_deref().filter(|l| !l.trim().is_empty()) {
        let code = language_code(language)
            .ok_or_else(|| AppError::Validation(format!("Unknown language: {}", language)))?;
        filters = filters.language(&code);
    }

    let page = if exclude.is_empty() {
        MOOD_PAGE
    } else {
        MOOD_RETRY_PAGE
    };
    let candidates = movies_from_page(&state.movies.discover(&filters, page).await?);

    recommend_for_mood(&candidates, &selection, &exclude)
        .map(|movie| Json(ApiResponse::ok(movie)))
        .ok_or_else(|| AppError::NotFound("No movies found with these preferences".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_selection_resolves_names() {
        let query = MoodQuery {
            mood: Some("sad".to_string()),
            genres: Some("Drama,Mystery".to_string()),
            ..Default::default()
        };
        let selection = mood_selection(&query).unwrap();
        assert_eq!(selection.mood, Mood::Sad);
        assert_eq!(selection.genre_ids, vec![18, 9648]);
    }

    #[test]
    fn test_mood_selection_rejects_unknown() {
        let bad_mood = MoodQuery {
            mood: Some("furious".to_string()),
            ..Default::default()
        };
        assert!(matches!(mood_selection(&bad_mood), Err(AppError::Validation(_))));

        let bad_genre = MoodQuery {
            mood: Some("happy".to_string()),
            genres: Some("Western".to_string()),
            ..Default::default()
        };
        assert!(matches!(mood_selection(&bad_genre), Err(AppError::Validation(_))));
    }
}
