//! CheapShark price comparison API (no key required)
//!
//! Deals: https://www.cheapshark.com/api/1.0/deals?title={title}&pageSize=10
//! Games: https://www.cheapshark.com/api/1.0/games?title={title}&limit=10

use serde::de::DeserializeOwned;
use tracing::error;

use game_library_core::{cheapest_deal, Deal, DealSearchGame, GameDealInfo, Store};

use crate::config::Config;
use crate::error::Result;
use crate::http::{build_url, companion_client, get_json, params};

#[derive(Debug, Clone)]
pub struct CheapSharkClient {
    http: reqwest::Client,
    base_url: String,
}

impl CheapSharkClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: companion_client(config.companion_timeout()),
            base_url: config.cheapshark_base_url.clone(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: Vec<(String, String)>) -> Result<T> {
        get_json(&self.http, &build_url(&self.base_url, path, &query)).await
    }

    /// Deals whose title matches
    pub async fn search_deals(&self, title: &str) -> Vec<Deal> {
        self.get("/deals", params(&[("title", title), ("pageSize", "10")]))
            .await
            .unwrap_or_else(|e| {
                error!("CheapShark deals error: {}", e);
                Vec::new()
            })
    }

    /// Games currently on sale, optionally for one store
    pub async fn current_deals(&self, store_id: Option<&str>, page: u32) -> Vec<Deal> {
        let page = page.to_string();
        let mut query = params(&[("pageNumber", &page), ("pageSize", "20"), ("onSale", "1")]);
        if let Some(store) = store_id {
            query.push(("storeID".to_string(), store.to_string()));
        }
        self.get("/deals", query).await.unwrap_or_else(|e| {
            error!("CheapShark current deals error: {}", e);
            Vec::new()
        })
    }

    pub async fn stores(&self) -> Vec<Store> {
        self.get("/stores", Vec::new()).await.unwrap_or_else(|e| {
            error!("CheapShark stores error: {}", e);
            Vec::new()
        })
    }

    /// Every store offer for a CheapShark game id
    pub async fn game_deals(&self, game_id: &str) -> Option<GameDealInfo> {
        self.get("/games", params(&[("id", game_id)]))
            .await
            .map_err(|e| error!("CheapShark game deals error: {}", e))
            .ok()
    }

    pub async fn search(&self, title: &str) -> Vec<DealSearchGame> {
        self.get("/games", params(&[("title", title), ("limit", "10")]))
            .await
            .unwrap_or_else(|e| {
                error!("CheapShark search error: {}", e);
                Vec::new()
            })
    }

    /// Cheapest current deal for a title across all stores
    pub async fn best_price(&self, title: &str) -> Option<Deal> {
        cheapest_deal(self.search_deals(title).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{config_for, serve};
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_best_price_picks_cheapest_sale() {
        let router = Router::new().route(
            "/deals",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("pageSize").map(String::as_str), Some("10"));
                Json(serde_json::json!([
                    {"dealID": "a", "title": "Portal 2", "storeID": "1", "salePrice": "9.99", "normalPrice": "19.99", "savings": "50.0"},
                    {"dealID": "b", "title": "Portal 2", "storeID": "7", "salePrice": "1.99", "normalPrice": "19.99", "savings": "90.0"},
                    {"dealID": "c", "title": "Portal 2", "storeID": "3", "salePrice": "4.99", "normalPrice": "19.99", "savings": "75.0"}
                ]))
            }),
        );
        let client = CheapSharkClient::new(&config_for(&serve(router).await));
        let best = client.best_price("Portal 2").await.unwrap();
        assert_eq!(best.deal_id, "b");
        assert_eq!(best.savings_percent(), 90);
    }

    #[tokio::test]
    async fn test_failures_become_empty() {
        let router = Router::new()
            .route("/deals", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
            .route("/games", get(|| async { "not json" }));
        let client = CheapSharkClient::new(&config_for(&serve(router).await));
        assert!(client.search_deals("x").await.is_empty());
        assert!(client.best_price("x").await.is_none());
        assert!(client.current_deals(Some("1"), 0).await.is_empty());
        assert!(client.game_deals("612").await.is_none());
        assert!(client.search("x").await.is_empty());
    }
}
