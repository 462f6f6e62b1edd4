//! Network side of the game library: a quota-limited RAWG client, companion
//! providers, recommendations and local persistence.

pub mod aggregate;
pub mod cheapshark;
pub mod config;
pub mod error;
pub mod freetogame;
pub mod http;
pub mod igdb;
pub mod rate_limit;
pub mod rawg;
pub mod recommend;
pub mod steam;
pub mod storage;
pub mod trailer;

#[cfg(test)]
mod test_support;

pub use aggregate::{FullGameData, Providers, Trending};
pub use cheapshark::CheapSharkClient;
pub use config::Config;
pub use error::{ClientError, Result};
pub use freetogame::FreeToGameClient;
pub use igdb::IgdbClient;
pub use rate_limit::{QuotaMode, RateLimiter};
pub use rawg::RawgClient;
pub use recommend::{RecommendationCache, RecommendationEngine};
pub use steam::SteamClient;
pub use storage::{restore_comparison, save_comparison, LocalStorage, WishlistStore};
pub use trailer::{search_link, TrailerFinder};
