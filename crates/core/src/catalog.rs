//! The catalog seam the recommendation engine is written against

use async_trait::async_trait;

use crate::constants::{MAX_SIMILAR_GAMES, SERIES_SUFFICIENT};
use crate::fallback::Fetched;
use crate::models::Game;

/// Appends `candidates` to `into`, skipping `exclude` and ids already present,
/// until `into` holds `cap` games
pub fn extend_unique(into: &mut Vec<Game>, candidates: Vec<Game>, exclude: u64, cap: usize) {
    for game in candidates {
        if into.len() >= cap {
            break;
        }
        if game.id != exclude && !into.iter().any(|g| g.id == game.id) {
            into.push(game);
        }
    }
}

#[async_trait]
pub trait GameCatalog: Send + Sync {
    async fn game_details(&self, id: u64) -> Fetched<Game>;

    /// Other games in the same series
    async fn series_games(&self, id: u64) -> Fetched<Vec<Game>>;

    /// Top-rated games of a genre, without `exclude`
    async fn games_by_genre(&self, genre_id: u64, exclude: Option<u64>) -> Fetched<Vec<Game>>;

    /// Series games, padded from the first genre when the series is short
    async fn recommendations(&self, id: u64) -> Fetched<Vec<Game>> {
        let (game, mut degraded) = self.game_details(id).await.split();
        let (series, reason) = self.series_games(id).await.split();
        degraded = degraded.or(reason);

        let mut combined = Vec::new();
        extend_unique(&mut combined, series, id, MAX_SIMILAR_GAMES);
        if combined.len() < SERIES_SUFFICIENT {
            if let Some(genre) = game.genres.first() {
                let (by_genre, reason) = self.games_by_genre(genre.id, Some(id)).await.split();
                degraded = degraded.or(reason);
                extend_unique(&mut combined, by_genre, id, MAX_SIMILAR_GAMES);
            }
        }
        Fetched::from_parts(combined, degraded)
    }
}
