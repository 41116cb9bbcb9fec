//! Recommendation heuristics
//!
//! Pure functions over movie lists. Anything random takes its source as a
//! parameter so callers (and tests) decide how it is seeded.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::models::MovieSummary;

// == Lookup tables ==
pub const GENRES: &[(&str, u32)] = &[
    ("action", 28),
    ("adventure", 12),
    ("animation", 16),
    ("comedy", 35),
    ("drama", 18),
    ("fantasy", 14),
    ("horror", 27),
    ("music", 10402),
    ("mystery", 9648),
    ("romance", 10749),
    ("sci-fi", 878),
    ("thriller", 53),
];

pub const LANGUAGES: &[(&str, &str)] = &[
    ("english", "en"),
    ("french", "fr"),
    ("hindi", "hi"),
    ("japanese", "ja"),
    ("kannada", "kn"),
    ("korean", "ko"),
    ("malayalam", "ml"),
    ("tamil", "ta"),
    ("telugu", "te"),
];

/// Resolves a genre name (case-insensitive) or a numeric TMDB id.
pub fn genre_id(name: &str) -> Option<u32> {
    let name = name.trim();
    if let Ok(id) = name.parse::<u32>() {
        return Some(id);
    }
    GENRES
        .iter()
        .find(|(genre, _)| genre.eq_ignore_ascii_case(name))
        .map(|(_, id)| *id)
}

/// Resolves a language name or a two-letter ISO 639-1 code.
pub fn language_code(name: &str) -> Option<String> {
    let name = name.trim();
    if let Some((_, code)) = LANGUAGES
        .iter()
        .find(|(language, _)| language.eq_ignore_ascii_case(name))
    {
        return Some((*code).to_string());
    }
    (name.len() == 2 && name.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| name.to_ascii_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Neutral,
}

impl Mood {
    /// Genres that fit the mood.
    pub fn genre_ids(self) -> &'static [u32] {
        match self {
            Mood::Happy => &[35, 10749, 12, 16, 10402],
            Mood::Sad => &[18, 10749, 9648],
            Mood::Neutral => &[28, 878, 53, 14],
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "happy" => Ok(Mood::Happy),
            "sad" => Ok(Mood::Sad),
            "neutral" => Ok(Mood::Neutral),
            other => Err(format!(
                "Unknown mood '{}', expected happy, sad or neutral",
                other
            )),
        }
    }
}

// == Rank and partially shuffle ==
/// Orders `items` by descending score, keeps the first `preserved` in that
/// order and shuffles the rest.
///
/// `score_fn` receives each item's position in the input and the item.
/// Equal scores keep their input order. With `preserved >= items.len()` the
/// result is fully ranked; with `preserved == 0` it is fully shuffled.
pub fn rank_and_partially_shuffle<T, F, R>(
    items: Vec<T>,
    preserved: usize,
    score_fn: F,
    rng: &mut R,
) -> Vec<T>
where
    F: Fn(usize, &T) -> f64,
    R: Rng + ?Sized,
{
    let mut scored: Vec<(f64, T)> = items
        .into_iter()
        .enumerate()
        .map(|(rank, item)| (score_fn(rank, &item), item))
        .collect();

    // total_cmp keeps the order total even with NaN scores
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut ranked: Vec<T> = scored.into_iter().map(|(_, item)| item).collect();
    let split = preserved.min(ranked.len());
    ranked[split..].shuffle(rng);
    ranked
}

// == Candidate merging ==
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShuffleWeights {
    pub top_rated: f64,
    pub top_reviewed: f64,
}

impl Default for ShuffleWeights {
    fn default() -> Self {
        Self {
            top_rated: 2.0,
            top_reviewed: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMovie {
    #[serde(flatten)]
    pub movie: MovieSummary,
    pub score: f64,
}

/// Combined rating of a single movie: `vote_average * 2 + vote_count / 1000`.
pub fn combined_rating(movie: &MovieSummary) -> f64 {
    movie.vote_average * 2.0 + movie.vote_count as f64 / 1000.0
}

/// Merges two ranked lists into one scored list.
///
/// A movie at index `i` of a list of length `n` earns `(n - i) * weight`
/// points; a movie in both lists earns both. The combined rating is added
/// once. Output keeps first-appearance order.
pub fn merge_candidates(
    top_rated: Vec<MovieSummary>,
    top_reviewed: Vec<MovieSummary>,
    weights: ShuffleWeights,
) -> Vec<ScoredMovie> {
    let mut merged: Vec<ScoredMovie> = Vec::with_capacity(top_rated.len() + top_reviewed.len());
    let mut index: HashMap<u64, usize> = HashMap::new();

    for (list, weight) in [(top_rated, weights.top_rated), (top_reviewed, weights.top_reviewed)] {
        let len = list.len();
        for (i, movie) in list.into_iter().enumerate() {
            let points = (len - i) as f64 * weight;
            match index.get(&movie.id) {
                Some(&at) => merged[at].score += points,
                None => {
                    index.insert(movie.id, merged.len());
                    let score = points + combined_rating(&movie);
                    merged.push(ScoredMovie { movie, score });
                }
            }
        }
    }

    merged
}

// == Mood pick ==
#[derive(Debug, Clone, PartialEq)]
pub struct MoodSelection {
    pub mood: Mood,
    pub genre_ids: Vec<u32>,
}

/// Rating bucket of half a point.
fn rating_bucket(movie: &MovieSummary) -> i64 {
    (movie.vote_average * 2.0).floor() as i64
}

/// Best first: rating bucket, then vote count, then exact rating.
fn by_rating(a: &MovieSummary, b: &MovieSummary) -> Ordering {
    rating_bucket(b)
        .cmp(&rating_bucket(a))
        .then_with(|| b.vote_count.cmp(&a.vote_count))
        .then_with(|| b.vote_average.total_cmp(&a.vote_average))
}

/// Picks the single best movie for a mood and genre selection.
///
/// A candidate must carry at least one genre of the mood and every selected
/// genre. When nothing qualifies and more than one genre was selected, any
/// movie matching at least half of the selected genres (rounded up) is
/// accepted instead. Excluded ids are never returned.
pub fn recommend_for_mood(
    candidates: &[MovieSummary],
    selection: &MoodSelection,
    exclude: &[u64],
) -> Option<MovieSummary> {
    let mood_genres = selection.mood.genre_ids();
    let selected = &selection.genre_ids;

    let mut matches: Vec<&MovieSummary> = candidates
        .iter()
        .filter(|m| mood_genres.iter().any(|g| m.has_genre(*g)))
        .filter(|m| selected.iter().all(|g| m.has_genre(*g)))
        .collect();

    if matches.is_empty() && selected.len() > 1 {
        let needed = selected.len().div_ceil(2);
        matches = candidates
            .iter()
            .filter(|m| selected.iter().filter(|g| m.has_genre(**g)).count() >= needed)
            .collect();
    }

    matches.retain(|m| !exclude.contains(&m.id));
    matches.sort_by(|a, b| by_rating(a, b));
    matches.first().map(|m| (*m).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn movie(id: u64, vote_average: f64, vote_count: u64, genre_ids: &[u32]) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            original_title: None,
            overview: None,
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            vote_average,
            vote_count,
            popularity: 0.0,
            genre_ids: genre_ids.to_vec(),
            original_language: Some("en".to_string()),
        }
    }

    #[test]
    fn test_preserved_head_is_stable_across_seeds() {
        let items: Vec<u32> = (0..20).collect();
        let expected = vec![19, 18, 17];

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = rank_and_partially_shuffle(items.clone(), 3, |_, v| *v as f64, &mut rng);

            assert_eq!(out.len(), 20);
            assert_eq!(out[..3], expected[..]);

            let mut sorted = out.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, items);
        }
    }

    #[test]
    fn test_tail_is_actually_shuffled() {
        let items: Vec<u32> = (0..20).collect();
        let ranked: Vec<u32> = (0..20).rev().collect();

        let differs = (0..20).any(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            rank_and_partially_shuffle(items.clone(), 3, |_, v| *v as f64, &mut rng) != ranked
        });
        assert!(differs);
    }

    #[test]
    fn test_same_seed_same_output() {
        let items: Vec<u32> = (0..20).collect();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            rank_and_partially_shuffle(items.clone(), 3, |_, v| *v as f64, &mut rng)
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_preserved_beyond_length_is_full_ranking() {
        let mut rng = StdRng::seed_from_u64(7);
        let out = rank_and_partially_shuffle(vec![1, 3, 2], 10, |_, v| *v as f64, &mut rng);
        assert_eq!(out, vec![3, 2, 1]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = rank_and_partially_shuffle(vec!["a", "b", "c"], 3, |_, _| 1.0, &mut rng);
        assert_eq!(out, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_score_fn_sees_input_rank() {
        let mut rng = StdRng::seed_from_u64(1);
        let out =
            rank_and_partially_shuffle(vec!["a", "b", "c"], 3, |rank, _| rank as f64, &mut rng);
        assert_eq!(out, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_empty_input() {
        let mut rng = StdRng::seed_from_u64(1);
        let out: Vec<u32> = rank_and_partially_shuffle(vec![], 3, |_, v| *v as f64, &mut rng);
        assert!(out.is_empty());
    }

    #[test]
    fn test_merge_candidates_scores() {
        let top_rated = vec![movie(1, 8.0, 2000, &[]), movie(2, 7.0, 1000, &[])];
        let top_reviewed = vec![movie(2, 7.0, 1000, &[]), movie(3, 6.0, 5000, &[])];

        let merged = merge_candidates(top_rated, top_reviewed, ShuffleWeights::default());
        let score = |id| merged.iter().find(|s| s.movie.id == id).unwrap().score;

        assert_eq!(merged.len(), 3);
        // rank points 2*2 + rating 16 + 2
        assert!((score(1) - 22.0).abs() < 1e-9);
        // 1*2 + 2*1 + 14 + 1
        assert!((score(2) - 19.0).abs() < 1e-9);
        // 1*1 + 12 + 5
        assert!((score(3) - 18.0).abs() < 1e-9);
        assert_eq!(merged.iter().map(|s| s.movie.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_mood_requires_mood_genre_and_all_selected() {
        let candidates = vec![
            movie(1, 9.0, 100, &[28]),
            movie(2, 7.0, 100, &[35, 12]),
            movie(3, 8.0, 100, &[35]),
        ];
        let selection = MoodSelection {
            mood: Mood::Happy,
            genre_ids: vec![35, 12],
        };

        let pick = recommend_for_mood(&candidates, &selection, &[]).unwrap();
        assert_eq!(pick.id, 2);
    }

    #[test]
    fn test_mood_relaxes_to_half_of_selected() {
        let candidates = vec![movie(1, 7.5, 100, &[28, 53]), movie(2, 6.0, 100, &[99])];
        let selection = MoodSelection {
            mood: Mood::Sad,
            genre_ids: vec![28, 53, 878],
        };

        let pick = recommend_for_mood(&candidates, &selection, &[]).unwrap();
        assert_eq!(pick.id, 1);
    }

    #[test]
    fn test_mood_single_genre_does_not_relax() {
        let candidates = vec![movie(1, 7.5, 100, &[28])];
        let selection = MoodSelection {
            mood: Mood::Sad,
            genre_ids: vec![28],
        };
        assert!(recommend_for_mood(&candidates, &selection, &[]).is_none());
    }

    #[test]
    fn test_mood_prefers_votes_within_half_point() {
        let candidates = vec![
            movie(1, 8.1, 500, &[18]),
            movie(2, 8.3, 9000, &[18]),
            movie(3, 7.4, 50000, &[18]),
        ];
        let selection = MoodSelection {
            mood: Mood::Sad,
            genre_ids: vec![],
        };

        let pick = recommend_for_mood(&candidates, &selection, &[]).unwrap();
        assert_eq!(pick.id, 2);

        let next = recommend_for_mood(&candidates, &selection, &[2]).unwrap();
        assert_eq!(next.id, 1);
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(genre_id("Sci-Fi"), Some(878));
        assert_eq!(genre_id("28"), Some(28));
        assert_eq!(genre_id("western"), None);
        assert_eq!(language_code("Telugu").as_deref(), Some("te"));
        assert_eq!(language_code("DE").as_deref(), Some("de"));
        assert_eq!(language_code("Klingon"), None);
        assert_eq!("Happy".parse::<Mood>(), Ok(Mood::Happy));
        assert!("angry".parse::<Mood>().is_err());
    }
}
