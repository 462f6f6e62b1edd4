//! Local HTTP fixtures for provider tests

use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::Config;

pub const TEST_KEY: &str = "test-key-0123456789";

/// Serve `router` on an ephemeral port and return its base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Config pointing every provider at `base`
pub fn config_for(base: &str) -> Config {
    Config {
        rawg_api_key: TEST_KEY.to_string(),
        rawg_base_url: base.to_string(),
        cheapshark_base_url: base.to_string(),
        freetogame_base_url: base.to_string(),
        steam_store_base_url: base.to_string(),
        steamspy_base_url: format!("{}/api.php", base),
        igdb_proxy_url: format!("{}/igdb", base),
        youtube_search_url: format!("{}/youtube/v3/search", base),
        companion_timeout_secs: 5,
        ..Default::default()
    }
}

/// Shared request counter for handlers
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Minimal RAWG game JSON
pub fn game_json(id: u64, name: &str, genre: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "released": "2020-01-01",
        "rating": 4.0,
        "genres": [{"id": genre, "name": "Genre", "slug": "genre"}],
        "parent_platforms": [{"platform": {"id": 1, "name": "PC", "slug": "pc"}}]
    })
}

pub fn page_json(results: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results,
    })
}
