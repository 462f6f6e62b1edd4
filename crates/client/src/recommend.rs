//! Similar-game and personalized recommendations with a short-lived cache

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use game_library_core::constants::{
    GENRE_SOURCES, MAX_PERSONALIZED, MAX_SIMILAR_GAMES, PERSONALIZED_SEEDS, RECOMMENDATION_TTL,
};
use game_library_core::{
    extend_unique, rank_by_similarity, Fetched, Game, GameCatalog, ScoredGame,
    Wishlist,
};

#[derive(Debug)]
struct CacheEntry {
    games: Vec<Game>,
    created: Instant,
}

/// Game lists keyed by string, each valid for a fixed time
#[derive(Debug)]
pub struct RecommendationCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Default for RecommendationCache {
    fn default() -> Self {
        Self::new(RECOMMENDATION_TTL)
    }
}

impl RecommendationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Stored list, unless it has expired. Expired entries are evicted.
    pub async fn get(&self, key: &str) -> Option<Vec<Game>> {
        let mut entries = self.entries.lock().await;
        let fresh = entries.get(key)?.created.elapsed() < self.ttl;
        if fresh {
            debug!(key, "Recommendation cache hit");
            entries.get(key).map(|entry| entry.games.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    pub async fn insert(&self, key: String, games: Vec<Game>) {
        let entry = CacheEntry {
            games,
            created: Instant::now(),
        };
        self.entries.lock().await.insert(key, entry);
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

pub struct RecommendationEngine<C> {
    catalog: C,
    cache: RecommendationCache,
}

impl<C: GameCatalog> RecommendationEngine<C> {
    pub fn new(catalog: C) -> Self {
        Self::with_ttl(catalog, RECOMMENDATION_TTL)
    }

    pub fn with_ttl(catalog: C, ttl: Duration) -> Self {
        Self {
            catalog,
            cache: RecommendationCache::new(ttl),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Up to six games like `game`: its series first, then top games from
    /// its first two genres. Never contains `game` itself.
    pub async fn similar_games(&self, game: &Game) -> Fetched<Vec<Game>> {
        let key = format!("similar_{}", game.id);
        if let Some(games) = self.cache.get(&key).await {
            return Fetched::Live(games);
        }

        let (series, mut degraded) = self.catalog.series_games(game.id).await.split();
        let mut results = Vec::new();
        extend_unique(&mut results, series, game.id, MAX_SIMILAR_GAMES);

        for genre in game.genres.iter().take(GENRE_SOURCES) {
            if results.len() >= MAX_SIMILAR_GAMES {
                break;
            }
            let (by_genre, reason) = self
                .catalog
                .games_by_genre(genre.id, Some(game.id))
                .await
                .split();
            degraded = degraded.or(reason);
            extend_unique(&mut results, by_genre, game.id, MAX_SIMILAR_GAMES);
        }

        if degraded.is_none() {
            self.cache.insert(key, results.clone()).await;
        }
        Fetched::from_parts(results, degraded)
    }

    /// [`Self::similar_games`] for a game known only by id
    pub async fn similar_games_for(&self, id: u64) -> Fetched<Vec<Game>> {
        let (game, reason) = self.catalog.game_details(id).await.split();
        let (games, similar_reason) = self.similar_games(&game).await.split();
        Fetched::from_parts(games, reason.or(similar_reason))
    }

    /// The catalog's per-game recommendations, cached
    pub async fn recommendations_for_game(&self, id: u64) -> Fetched<Vec<Game>> {
        let key = format!("recommendations_{}", id);
        if let Some(games) = self.cache.get(&key).await {
            return Fetched::Live(games);
        }
        let recommendations = self.catalog.recommendations(id).await;
        if recommendations.is_live() {
            self.cache.insert(key, recommendations.data().clone()).await;
        }
        recommendations
    }

    /// Recommendations seeded by the first three wishlist entries, minus
    /// anything already wished for, best rated first, at most ten
    pub async fn personalized(&self, wishlist: &Wishlist) -> Fetched<Vec<Game>> {
        let mut seen: HashSet<u64> = wishlist.entries().iter().map(|e| e.id).collect();
        let mut collected = Vec::new();
        let mut degraded = None;

        for entry in wishlist.entries().iter().take(PERSONALIZED_SEEDS) {
            let (recs, reason) = self.recommendations_for_game(entry.id).await.split();
            degraded = degraded.or(reason);
            for game in recs {
                if seen.insert(game.id) {
                    collected.push(game);
                }
            }
        }

        collected.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        collected.truncate(MAX_PERSONALIZED);
        Fetched::from_parts(collected, degraded)
    }

    pub fn rank_by_similarity(&self, reference: &Game, games: Vec<Game>) -> Vec<ScoredGame> {
        rank_by_similarity(reference, games)
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}
