//! Steam store and SteamSpy lookups (no key required)
//!
//! Store: https://store.steampowered.com/api/appdetails?appids={appid}
//! Returns: { "{appid}": { "success": bool, "data": {...} } }
//! SteamSpy: https://steamspy.com/api.php?request=appdetails&appid={appid}

use std::collections::HashMap;
use tracing::error;

use game_library_core::{SteamAppDetails, SteamSpyStats};

use crate::config::Config;
use crate::http::{build_url, companion_client, get_json, params};

#[derive(Debug, Clone)]
pub struct SteamClient {
    http: reqwest::Client,
    store_url: String,
    steamspy_url: String,
}

#[derive(Debug, serde::Deserialize)]
struct AppDetailsEntry {
    #[serde(default)]
    success: bool,
    data: Option<SteamAppDetails>,
}

impl SteamClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: companion_client(config.companion_timeout()),
            store_url: config.steam_store_base_url.clone(),
            steamspy_url: config.steamspy_base_url.clone(),
        }
    }

    /// Store page data, only when Steam reports success
    pub async fn app_details(&self, appid: u64) -> Option<SteamAppDetails> {
        let key = appid.to_string();
        let url = build_url(&self.store_url, "/appdetails", &params(&[("appids", &key)]));
        let mut body: HashMap<String, AppDetailsEntry> = get_json(&self.http, &url)
            .await
            .map_err(|e| error!("Steam app details error: {}", e))
            .ok()?;
        body.remove(&key)
            .filter(|entry| entry.success)
            .and_then(|entry| entry.data)
    }

    pub async fn steamspy_details(&self, appid: u64) -> Option<SteamSpyStats> {
        let appid = appid.to_string();
        let url = build_url(
            &self.steamspy_url,
            "",
            &params(&[("request", "appdetails"), ("appid", &appid)]),
        );
        get_json(&self.http, &url)
            .await
            .map_err(|e| error!("SteamSpy error: {}", e))
            .ok()
    }

    /// SteamSpy's top 100 by players in the last two weeks, keyed by appid
    pub async fn top_games_two_weeks(&self) -> HashMap<String, SteamSpyStats> {
        let url = build_url(&self.steamspy_url, "", &params(&[("request", "top100in2weeks")]));
        get_json(&self.http, &url).await.unwrap_or_else(|e| {
            error!("SteamSpy top games error: {}", e);
            HashMap::new()
        })
    }
}
