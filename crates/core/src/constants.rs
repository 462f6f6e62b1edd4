//! Quota, cache and list-size constants

use std::time::Duration;

/// Requests allowed inside one quota window
pub const MAX_REQUESTS_PER_WINDOW: usize = 40;

/// Length of the rolling quota window
pub const QUOTA_WINDOW: Duration = Duration::from_secs(60);

/// How often the background pruner drops expired request timestamps
pub const PRUNE_INTERVAL: Duration = Duration::from_secs(30);

/// Lifetime of a cached recommendation list
pub const RECOMMENDATION_TTL: Duration = Duration::from_secs(5 * 60);

/// Upper bound for "similar games" and per-game recommendation lists
pub const MAX_SIMILAR_GAMES: usize = 6;

/// Series results at or above this count are returned without genre padding
pub const SERIES_SUFFICIENT: usize = 4;

/// Number of leading genres consulted when padding similar games
pub const GENRE_SOURCES: usize = 2;

/// Wishlist entries used as seeds for personalized recommendations
pub const PERSONALIZED_SEEDS: usize = 3;

/// Upper bound for personalized recommendations
pub const MAX_PERSONALIZED: usize = 10;

/// Default RAWG page size
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Timeout applied to the video search fallback
pub const VIDEO_SEARCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Comparison slots available on a fresh board
pub const COMPARISON_SLOTS: usize = 3;

/// Hard limit for comparison slots
pub const MAX_COMPARISON_SLOTS: usize = 4;
