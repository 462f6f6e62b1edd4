//! Shared types for the game library: catalog models, similarity scoring,
//! filtering, comparison and wishlist state, and demo fallback data.
//!
//! No I/O happens here. The `async` feature adds the [`GameCatalog`] trait
//! that network clients implement.

pub mod comparison;
pub mod constants;
pub mod enhanced;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod models;
pub mod providers;
pub mod similarity;
pub mod wishlist;

#[cfg(feature = "async")]
pub mod catalog;

pub use comparison::{AttributeRow, ComparisonData, ComparisonSlots, SlotRef};
pub use enhanced::{merge_details, EnhancedGame, EnhancedScreenshot, EnhancedVideo};
pub use error::CoreError;
pub use fallback::{
    mock_free_games, mock_game_details, mock_games, search_mock_games, DegradeReason, Fetched,
};
pub use filter::{GameFilter, SortKey};
pub use models::{
    CatalogEntry, Game, Movie, MovieData, NamedRef, Page, PlatformGroup, Screenshot, Trailer,
};
pub use providers::{
    cheapest_deal, Deal, DealGameInfo, DealSearchGame, FreeGame, GameDealInfo, IgdbGame,
    IgdbImage, IgdbInvolvedCompany, IgdbNamed, IgdbVideo, PriceRecord, SteamAppDetails,
    SteamSpyStats, Store, StoreOffer,
};
pub use similarity::{rank_by_similarity, similarity_score, ScoredGame};
pub use wishlist::{Wishlist, WishlistEntry};

#[cfg(feature = "async")]
pub use catalog::{extend_unique, GameCatalog};
