//! FreeToGame listings (no key required)

use tracing::error;

use game_library_core::{mock_free_games, DegradeReason, Fetched, FreeGame};

use crate::config::Config;
use crate::http::{build_url, companion_client, get_json, params};

#[derive(Debug, Clone)]
pub struct FreeToGameClient {
    http: reqwest::Client,
    base_url: String,
}

impl FreeToGameClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: companion_client(config.companion_timeout()),
            base_url: config.freetogame_base_url.clone(),
        }
    }

    /// Free-to-play games, optionally narrowed by category. Platform defaults
    /// to `all`. Falls back to a short built-in list.
    pub async fn free_to_play(&self, category: Option<&str>, platform: Option<&str>) -> Fetched<Vec<FreeGame>> {
        let mut query = params(&[("platform", platform.unwrap_or("all"))]);
        if let Some(category) = category {
            query.push(("category".to_string(), category.to_string()));
        }
        let url = build_url(&self.base_url, "/games", &query);
        match get_json(&self.http, &url).await {
            Ok(games) => Fetched::Live(games),
            Err(e) => {
                error!("FreeToGame error: {}", e);
                Fetched::degraded(mock_free_games(), DegradeReason::RequestFailed(e.to_string()))
            }
        }
    }

    pub async fn free_game_details(&self, id: u64) -> Option<FreeGame> {
        let id = id.to_string();
        let url = build_url(&self.base_url, "/game", &params(&[("id", &id)]));
        get_json(&self.http, &url)
            .await
            .map_err(|e| error!("FreeToGame details error: {}", e))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{config_for, serve};
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_platform_defaults_to_all() {
        let router = Router::new().route(
            "/games",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                let platform = q.get("platform").cloned().unwrap_or_default();
                Json(serde_json::json!([{"id": 540, "title": "Overwatch 2", "platform": platform}]))
            }),
        );
        let client = FreeToGameClient::new(&config_for(&serve(router).await));
        let games = client.free_to_play(None, None).await;
        assert!(games.is_live());
        assert_eq!(games.data()[0].platform, "all");
    }

    #[tokio::test]
    async fn test_unreachable_provider_returns_builtin_list() {
        let client = FreeToGameClient::new(&config_for(&serve(Router::new()).await));
        let games = client.free_to_play(Some("shooter"), Some("pc")).await;
        assert!(games.is_degraded());
        let titles: Vec<&str> = games.data().iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Fortnite", "League of Legends", "Valorant"]);
        assert!(client.free_game_details(1).await.is_none());
    }
}
