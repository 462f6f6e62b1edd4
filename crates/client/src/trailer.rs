//! Trailer lookup: RAWG movies first, then YouTube search, then a plain
//! YouTube search link

use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use game_library_core::constants::VIDEO_SEARCH_TIMEOUT;
use game_library_core::Trailer;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::http::{build_url, companion_client, get_json, params};
use crate::rawg::RawgClient;

const YOUTUBE_RESULTS_URL: &str = "https://www.youtube.com/results";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: VideoId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

fn search_phrase(name: &str) -> String {
    format!("{} official game trailer", name)
}

/// Link to YouTube's own results page for the trailer search
pub fn search_link(name: &str) -> Trailer {
    Trailer::YouTubeSearch {
        search_url: build_url(
            YOUTUBE_RESULTS_URL,
            "",
            &params(&[("search_query", &search_phrase(name))]),
        ),
    }
}

#[derive(Debug, Clone)]
pub struct TrailerFinder {
    rawg: RawgClient,
    http: reqwest::Client,
    youtube_url: String,
    youtube_key: Option<String>,
    timeout: Duration,
}

impl TrailerFinder {
    pub fn new(config: &Config, rawg: RawgClient) -> Self {
        Self {
            rawg,
            http: companion_client(VIDEO_SEARCH_TIMEOUT),
            youtube_url: config.youtube_search_url.clone(),
            youtube_key: config.youtube_key().map(String::from),
            timeout: VIDEO_SEARCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = companion_client(timeout);
        self.timeout = timeout;
        self
    }

    /// Best available trailer. Always yields something: the search link is
    /// the last resort.
    pub async fn find(&self, name: &str) -> Trailer {
        if let Some(trailer) = self.from_rawg(name).await {
            return trailer;
        }
        if let Some(key) = &self.youtube_key {
            match self.from_youtube(name, key).await {
                Ok(Some(trailer)) => return trailer,
                Ok(None) => debug!(name, "YouTube search returned no videos"),
                Err(e) => warn!(name, error = %e, "YouTube search failed"),
            }
        }
        search_link(name)
    }

    async fn from_rawg(&self, name: &str) -> Option<Trailer> {
        let found = self.rawg.search_games(name).await;
        if found.is_degraded() {
            return None;
        }
        let game = found.into_inner().into_iter().next()?;
        let movies = self.rawg.game_movies(game.id).await;
        if movies.is_degraded() {
            return None;
        }
        let movie = movies.into_inner().into_iter().next()?;
        Some(Trailer::Rawg {
            video_url: movie.video_url(),
            id: movie.id,
            name: movie.name,
            preview: movie.preview,
        })
    }

    async fn from_youtube(&self, name: &str, key: &str) -> Result<Option<Trailer>> {
        let url = build_url(
            &self.youtube_url,
            "",
            &params(&[
                ("part", "snippet"),
                ("q", &search_phrase(name)),
                ("type", "video"),
                ("maxResults", "1"),
                ("key", key),
            ]),
        );
        let response: SearchResponse = tokio::time::timeout(self.timeout, get_json(&self.http, &url))
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))??;
        Ok(response.items.into_iter().next().map(|item| Trailer::YouTube {
            embed_url: format!("https://www.youtube.com/embed/{}?autoplay=1", item.id.video_id),
            id: item.id.video_id,
            title: item.snippet.title,
            thumbnail: item.snippet.thumbnails.high.map(|t| t.url),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{config_for, game_json, page_json, serve};
    use axum::routing::get;
    use axum::{Json, Router};

    fn youtube_item() -> serde_json::Value {
        serde_json::json!({"items": [{
            "id": {"videoId": "abc123"},
            "snippet": {"title": "Hades - Launch Trailer", "thumbnails": {"high": {"url": "https://i.ytimg.com/abc.jpg"}}}
        }]})
    }

    #[tokio::test]
    async fn test_rawg_movie_wins() {
        let router = Router::new()
            .route("/games", get(|| async { Json(page_json(vec![game_json(8, "Hades", 51)])) }))
            .route(
                "/games/{id}/movies",
                get(|| async {
                    Json(page_json(vec![serde_json::json!({
                        "id": 100, "name": "Launch", "preview": "p.jpg",
                        "data": {"480": "low.mp4", "max": "max.mp4"}
                    })]))
                }),
            );
        let config = config_for(&serve(router).await);
        let finder = TrailerFinder::new(&config, RawgClient::new(&config));
        match finder.find("Hades").await {
            Trailer::Rawg { id, video_url, .. } => {
                assert_eq!(id, 100);
                assert_eq!(video_url.as_deref(), Some("max.mp4"));
            }
            other => panic!("unexpected trailer: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_youtube_used_when_rawg_has_no_movies() {
        let router = Router::new()
            .route("/games", get(|| async { Json(page_json(vec![game_json(8, "Hades", 51)])) }))
            .route("/games/{id}/movies", get(|| async { Json(page_json(vec![])) }))
            .route("/youtube/v3/search", get(|| async { Json(youtube_item()) }));
        let mut config = config_for(&serve(router).await);
        config.youtube_api_key = Some("yt-key".into());
        let finder = TrailerFinder::new(&config, RawgClient::new(&config));
        match finder.find("Hades").await {
            Trailer::YouTube { id, embed_url, thumbnail, .. } => {
                assert_eq!(id, "abc123");
                assert_eq!(embed_url, "https://www.youtube.com/embed/abc123?autoplay=1");
                assert_eq!(thumbnail.as_deref(), Some("https://i.ytimg.com/abc.jpg"));
            }
            other => panic!("unexpected trailer: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_video_search_falls_through_to_link() {
        let router = Router::new().route(
            "/youtube/v3/search",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(youtube_item())
            }),
        );
        let mut config = config_for(&serve(router).await);
        config.rawg_api_key.clear();
        config.youtube_api_key = Some("yt-key".into());
        let finder = TrailerFinder::new(&config, RawgClient::new(&config))
            .with_timeout(Duration::from_millis(200));
        assert_eq!(
            finder.find("Hades").await,
            Trailer::YouTubeSearch {
                search_url: "https://www.youtube.com/results?search_query=Hades%20official%20game%20trailer".into()
            }
        );
    }

    #[tokio::test]
    async fn test_without_keys_returns_search_link() {
        let mut config = config_for("http://127.0.0.1:9");
        config.rawg_api_key.clear();
        let finder = TrailerFinder::new(&config, RawgClient::new(&config));
        assert!(matches!(finder.find("Portal 2").await, Trailer::YouTubeSearch { .. }));
    }
}
