//! IGDB lookups through the local proxy, and RAWG details enriched with them
//!
//! The proxy accepts `POST {"query": "<apicalypse>"}` and returns IGDB's
//! JSON array unchanged.

use tracing::{debug, error};

use game_library_core::{merge_details, EnhancedGame, Fetched, IgdbGame};

use crate::config::Config;
use crate::http::{companion_client, post_json};
use crate::rawg::RawgClient;

const FIELDS: &str = "fields name, summary, storyline, first_release_date, \
    genres.name, platforms.name, involved_companies.company.name, \
    involved_companies.developer, involved_companies.publisher, \
    screenshots.url, videos.video_id, videos.name;";

/// Fuzzy name match returning at most one game
pub fn name_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{} where name ~ \"{}\"; limit 1;", FIELDS, escaped)
}

#[derive(Debug, serde::Serialize)]
struct ProxyRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Clone)]
pub struct IgdbClient {
    http: reqwest::Client,
    proxy_url: String,
}

impl IgdbClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: companion_client(config.companion_timeout()),
            proxy_url: config.igdb_proxy_url.clone(),
        }
    }

    pub async fn game_by_name(&self, name: &str) -> Option<IgdbGame> {
        let query = name_query(name);
        let games: Vec<IgdbGame> = post_json(&self.http, &self.proxy_url, &ProxyRequest { query: &query })
            .await
            .map_err(|e| error!("IGDB details error: {}", e))
            .ok()?;
        games.into_iter().next()
    }

    /// RAWG details merged with the IGDB record of the same name. Without
    /// an IGDB match the RAWG data is used as is.
    pub async fn enhanced_details(&self, rawg: &RawgClient, id: u64) -> Fetched<EnhancedGame> {
        let (game, reason) = rawg.game_details(id).await.split();
        let igdb = self.game_by_name(&game.name).await;
        if igdb.is_none() {
            debug!(id, name = %game.name, "No IGDB match, using RAWG details only");
        }
        Fetched::from_parts(merge_details(game, igdb.as_ref()), reason)
    }
}
