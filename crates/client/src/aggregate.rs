//! Views combining several providers

use game_library_core::{Deal, Fetched, FreeGame, Game};

use crate::cheapshark::CheapSharkClient;
use crate::config::Config;
use crate::freetogame::FreeToGameClient;
use crate::http::params;
use crate::igdb::IgdbClient;
use crate::rawg::RawgClient;
use crate::steam::SteamClient;
use crate::trailer::TrailerFinder;

/// Entries kept per trending section
const TRENDING_LEN: usize = 10;

/// One client per provider, sharing a single RAWG quota window
#[derive(Debug, Clone)]
pub struct Providers {
    pub rawg: RawgClient,
    pub cheapshark: CheapSharkClient,
    pub freetogame: FreeToGameClient,
    pub steam: SteamClient,
    pub igdb: IgdbClient,
    pub trailers: TrailerFinder,
}

impl Providers {
    pub fn new(config: &Config) -> Self {
        let rawg = RawgClient::new(config);
        Self {
            trailers: TrailerFinder::new(config, rawg.clone()),
            rawg,
            cheapshark: CheapSharkClient::new(config),
            freetogame: FreeToGameClient::new(config),
            steam: SteamClient::new(config),
            igdb: IgdbClient::new(config),
        }
    }

    /// Details (when the RAWG id is known), deals for the name and the
    /// matching free-to-play entry, if any
    pub async fn full_game_data(&self, name: &str, rawg_id: Option<u64>) -> FullGameData {
        let basic = match rawg_id {
            Some(id) => Some(self.rawg.game_details(id).await),
            None => None,
        };
        let deals = self.cheapshark.search_deals(name).await;
        let needle = name.to_lowercase();
        let free_to_play = self
            .freetogame
            .free_to_play(None, None)
            .await
            .into_inner()
            .into_iter()
            .find(|g| g.title.to_lowercase().contains(&needle));
        FullGameData {
            basic,
            deals,
            free_to_play,
        }
    }

    /// Top-rated games, current sales and free-to-play titles, fetched
    /// concurrently
    pub async fn trending(&self) -> Trending {
        let top_rated_params = params(&[("ordering", "-rating"), ("page_size", "10")]);
        let (top_rated, on_sale, free_to_play) = tokio::join!(
            self.rawg.fetch_games(&top_rated_params),
            self.cheapshark.current_deals(None, 0),
            self.freetogame.free_to_play(None, None),
        );
        Trending {
            top_rated: top_rated.map(|page| page.results),
            on_sale: on_sale.into_iter().take(TRENDING_LEN).collect(),
            free_to_play: free_to_play.map(|games| games.into_iter().take(TRENDING_LEN).collect()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FullGameData {
    pub basic: Option<Fetched<Game>>,
    pub deals: Vec<Deal>,
    pub free_to_play: Option<FreeGame>,
}

#[derive(Debug, Clone)]
pub struct Trending {
    pub top_rated: Fetched<Vec<Game>>,
    pub on_sale: Vec<Deal>,
    pub free_to_play: Fetched<Vec<FreeGame>>,
}
