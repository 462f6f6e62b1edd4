//! Weighted similarity between two games
//!
//! The score is a fixed sum of five bands:
//!
//! | Band       | Formula                              | Max |
//! |------------|--------------------------------------|-----|
//! | Genres     | shared genre ids x 10                | 30  |
//! | Platforms  | shared parent platform ids x 5       | 20  |
//! | Rating     | 20 - abs(rating delta) x 10          | 20  |
//! | Year       | 15 - abs(release year delta)         | 15  |
//! | Metacritic | 15 - abs(metacritic delta) / 5       | 15  |
//!
//! Every band is clamped at zero, so the total stays within 0..=100.

use crate::models::Game;

const GENRE_POINTS: f64 = 10.0;
const GENRE_CAP: f64 = 30.0;
const PLATFORM_POINTS: f64 = 5.0;
const PLATFORM_CAP: f64 = 20.0;
const RATING_MAX: f64 = 20.0;
const RATING_FACTOR: f64 = 10.0;
const YEAR_MAX: f64 = 15.0;
const METACRITIC_MAX: f64 = 15.0;
const METACRITIC_DIVISOR: f64 = 5.0;

pub fn similarity_score(a: &Game, b: &Game) -> f64 {
    genre_band(a, b) + platform_band(a, b) + rating_band(a, b) + year_band(a, b) + metacritic_band(a, b)
}

fn genre_band(a: &Game, b: &Game) -> f64 {
    let shared = a.genre_ids().intersection(&b.genre_ids()).count();
    (shared as f64 * GENRE_POINTS).min(GENRE_CAP)
}

fn platform_band(a: &Game, b: &Game) -> f64 {
    let shared = a.platform_ids().intersection(&b.platform_ids()).count();
    (shared as f64 * PLATFORM_POINTS).min(PLATFORM_CAP)
}

fn rating_band(a: &Game, b: &Game) -> f64 {
    (RATING_MAX - (a.rating - b.rating).abs() * RATING_FACTOR).max(0.0)
}

// Missing or unparsable dates contribute nothing
fn year_band(a: &Game, b: &Game) -> f64 {
    match (a.release_year(), b.release_year()) {
        (Some(ya), Some(yb)) => (YEAR_MAX - f64::from((ya - yb).abs())).max(0.0),
        _ => 0.0,
    }
}

fn metacritic_band(a: &Game, b: &Game) -> f64 {
    let ma = f64::from(a.metacritic.unwrap_or(0));
    let mb = f64::from(b.metacritic.unwrap_or(0));
    (METACRITIC_MAX - (ma - mb).abs() / METACRITIC_DIVISOR).max(0.0)
}

/// A candidate paired with its score against a reference game
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredGame {
    pub game: Game,
    pub score: f64,
}

/// Score every candidate against `reference`, best first. Equal scores keep
/// their input order.
pub fn rank_by_similarity(reference: &Game, games: Vec<Game>) -> Vec<ScoredGame> {
    let mut scored: Vec<ScoredGame> = games
        .into_iter()
        .map(|game| ScoredGame {
            score: similarity_score(reference, &game),
            game,
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}
