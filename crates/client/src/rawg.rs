//! RAWG metadata client
//!
//! Every outbound call goes through the shared [`RateLimiter`]. Endpoint
//! methods never fail: when the key is missing or a request goes wrong they
//! return demo data (or an empty list) tagged as [`Fetched::Degraded`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{error, warn};

use game_library_core::constants::{DEFAULT_PAGE_SIZE, MAX_SIMILAR_GAMES};
use game_library_core::{
    mock_game_details, mock_games, search_mock_games, CatalogEntry, DegradeReason, Fetched, Game,
    GameCatalog, GameFilter, Movie, Page, Screenshot,
};

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::http::{build_url, check_status, params, redact_key};
use crate::rate_limit::RateLimiter;

/// Page size for series and developer listings
const RELATED_PAGE_SIZE: &str = "6";
/// Genre listings fetch a few extra so the excluded game can be dropped
const GENRE_PAGE_SIZE: &str = "10";

#[derive(Debug, Clone)]
pub struct RawgClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    key_configured: bool,
    limiter: Arc<RateLimiter>,
}

impl RawgClient {
    pub fn new(config: &Config) -> Self {
        Self::with_limiter(config, Arc::new(RateLimiter::from_config(config)))
    }

    /// Share one quota window between several clients
    pub fn with_limiter(config: &Config, limiter: Arc<RateLimiter>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.rawg_base_url.clone(),
            api_key: config.rawg_api_key.trim().to_string(),
            key_configured: config.is_api_key_configured(),
            limiter,
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn is_configured(&self) -> bool {
        self.key_configured
    }

    /// GET `url` once quota allows, returning the parsed JSON body
    pub async fn fetch_with_quota(&self, url: &str) -> Result<serde_json::Value> {
        self.limiter.acquire().await;
        tracing::debug!(url = %redact_key(url), "RAWG request");
        let response = self.http.get(url).send().await?;
        check_status(response.status(), url)?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn url(&self, path: &str, extra: Vec<(String, String)>) -> String {
        let mut query = vec![("key".to_string(), self.api_key.clone())];
        query.extend(extra);
        build_url(&self.base_url, path, &query)
    }

    /// Fetch and decode, substituting `fallback` when that is not possible
    async fn fetch_or<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: Vec<(String, String)>,
        fallback: impl FnOnce() -> T,
    ) -> Fetched<T> {
        if !self.key_configured {
            warn!(path, "RAWG API key not configured, using demo data. Get a free key at https://rawg.io/apidocs");
            return Fetched::degraded(fallback(), DegradeReason::MissingApiKey);
        }
        let url = self.url(path, extra);
        let result = match self.fetch_with_quota(&url).await {
            Ok(value) => serde_json::from_value::<T>(value).map_err(ClientError::from),
            Err(e) => Err(e),
        };
        match result {
            Ok(data) => Fetched::Live(data),
            Err(ClientError::Unauthorized) => {
                warn!(path, "API key is invalid or missing. Using fallback data.");
                Fetched::degraded(fallback(), DegradeReason::Unauthorized)
            }
            Err(e) => {
                error!(path, error = %e, "RAWG request failed, using fallback data");
                Fetched::degraded(fallback(), DegradeReason::RequestFailed(e.to_string()))
            }
        }
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: Vec<(String, String)>,
    ) -> Fetched<Vec<T>> {
        self.fetch_or::<Page<T>>(path, extra, Page::default)
            .await
            .map(|page| page.results)
    }

    /// `/games` with caller parameters; `page_size` defaults to 20
    pub async fn fetch_games(&self, extra: &[(String, String)]) -> Fetched<Page<Game>> {
        let mut query = Vec::with_capacity(extra.len() + 1);
        if !extra.iter().any(|(k, _)| k == "page_size") {
            query.push(("page_size".to_string(), DEFAULT_PAGE_SIZE.to_string()));
        }
        query.extend(extra.iter().cloned());
        self.fetch_or("/games", query, || Page::from_results(mock_games()))
            .await
    }

    pub async fn search_games(&self, query: &str) -> Fetched<Vec<Game>> {
        let page_size = DEFAULT_PAGE_SIZE.to_string();
        self.fetch_or(
            "/games",
            params(&[("search", query), ("page_size", &page_size)]),
            || Page::from_results(search_mock_games(query)),
        )
        .await
        .map(|page: Page<Game>| page.results)
    }

    pub async fn game_details(&self, id: u64) -> Fetched<Game> {
        self.fetch_or(&format!("/games/{}", id), Vec::new(), || mock_game_details(id))
            .await
    }

    pub async fn game_screenshots(&self, id: u64) -> Fetched<Vec<Screenshot>> {
        self.fetch_list(&format!("/games/{}/screenshots", id), Vec::new())
            .await
    }

    pub async fn game_movies(&self, id: u64) -> Fetched<Vec<Movie>> {
        self.fetch_list(&format!("/games/{}/movies", id), Vec::new())
            .await
    }

    /// Other entries of the game's series
    pub async fn series_games(&self, id: u64) -> Fetched<Vec<Game>> {
        self.fetch_list(
            &format!("/games/{}/game-series", id),
            params(&[("page_size", RELATED_PAGE_SIZE)]),
        )
        .await
    }

    pub async fn games_by_developer(&self, developer_id: u64) -> Fetched<Vec<Game>> {
        let developer = developer_id.to_string();
        self.fetch_list(
            "/games",
            params(&[("developers", &developer), ("page_size", RELATED_PAGE_SIZE)]),
        )
        .await
    }

    /// Top-rated games of a genre, without `exclude`, at most six
    pub async fn games_by_genre(&self, genre_id: u64, exclude: Option<u64>) -> Fetched<Vec<Game>> {
        let genre = genre_id.to_string();
        self.fetch_list(
            "/games",
            params(&[
                ("genres", &genre),
                ("page_size", GENRE_PAGE_SIZE),
                ("ordering", "-rating"),
            ]),
        )
        .await
        .map(|games: Vec<Game>| {
            games
                .into_iter()
                .filter(|g| Some(g.id) != exclude)
                .take(MAX_SIMILAR_GAMES)
                .collect()
        })
    }

    pub async fn genres(&self) -> Fetched<Vec<CatalogEntry>> {
        self.fetch_list("/genres", Vec::new()).await
    }

    pub async fn platforms(&self) -> Fetched<Vec<CatalogEntry>> {
        let page_size = DEFAULT_PAGE_SIZE.to_string();
        self.fetch_list("/platforms", params(&[("page_size", &page_size)]))
            .await
    }

    pub async fn games_with_filters(&self, filter: &GameFilter) -> Fetched<Page<Game>> {
        let mut query = vec![("page_size".to_string(), DEFAULT_PAGE_SIZE.to_string())];
        query.extend(filter.to_params());
        self.fetch_or("/games", query, Page::default).await
    }
}

#[async_trait]
impl GameCatalog for RawgClient {
    async fn game_details(&self, id: u64) -> Fetched<Game> {
        RawgClient::game_details(self, id).await
    }

    async fn series_games(&self, id: u64) -> Fetched<Vec<Game>> {
        RawgClient::series_games(self, id).await
    }

    async fn games_by_genre(&self, genre_id: u64, exclude: Option<u64>) -> Fetched<Vec<Game>> {
        RawgClient::games_by_genre(self, genre_id, exclude).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{config_for, game_json, page_json, serve, Hits, TEST_KEY};
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    fn catalog_router(hits: Hits) -> Router {
        let details = hits.clone();
        let series = hits.clone();
        let listing = hits;
        Router::new()
            .route(
                "/games/{id}",
                get(move |Path(id): Path<u64>| {
                    details.bump();
                    async move { Json(game_json(id, &format!("Game {}", id), 4)) }
                }),
            )
            .route(
                "/games/{id}/game-series",
                get(move |Path(id): Path<u64>| {
                    series.bump();
                    async move { Json(page_json(vec![game_json(id, "Self", 4), game_json(20, "Sequel", 4)])) }
                }),
            )
            .route(
                "/games",
                get(move |Query(q): Query<HashMap<String, String>>| {
                    listing.bump();
                    async move {
                        assert_eq!(q.get("key").map(String::as_str), Some(TEST_KEY));
                        let games = if q.contains_key("genres") {
                            (30..40).map(|id| game_json(id, "Genre pick", 4)).collect()
                        } else {
                            vec![game_json(1, q.get("search").map(String::as_str).unwrap_or("x"), 4)]
                        };
                        Json(page_json(games))
                    }
                }),
            )
            .route("/genres", get(|| async { Json(serde_json::json!({"count": 0})) }))
    }

    #[tokio::test]
    async fn test_missing_key_issues_no_request() {
        let hits = Hits::default();
        let base = serve(catalog_router(hits.clone())).await;
        let mut config = config_for(&base);
        config.rawg_api_key = "YOUR_RAWG_KEY".into();
        let client = RawgClient::new(&config);

        let found = client.search_games("hades").await;
        assert_eq!(found.reason(), Some(&DegradeReason::MissingApiKey));
        assert_eq!(found.data()[0].name, "Hades");
        assert!(client.game_screenshots(1).await.data().is_empty());
        assert_eq!(hits.get(), 0);
        assert_eq!(client.limiter().in_window().await, 0);
    }

    #[tokio::test]
    async fn test_unauthorized_degrades_to_mock_data() {
        let router = Router::new().route("/games", get(|| async { StatusCode::UNAUTHORIZED }));
        let client = RawgClient::new(&config_for(&serve(router).await));

        let page = client.fetch_games(&[]).await;
        assert_eq!(page.reason(), Some(&DegradeReason::Unauthorized));
        assert_eq!(page.data().results.len(), 8);
        assert_eq!(client.limiter().in_window().await, 1);
    }

    #[tokio::test]
    async fn test_server_error_degrades_with_status() {
        let router = Router::new().route(
            "/games/{id}",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let client = RawgClient::new(&config_for(&serve(router).await));

        let details = client.game_details(6).await;
        match details.reason() {
            Some(DegradeReason::RequestFailed(msg)) => {
                assert!(msg.contains("500"));
                assert!(!msg.contains(TEST_KEY));
            }
            other => panic!("unexpected reason: {:?}", other),
        }
        assert_eq!(details.data().name, "Elden Ring");
    }

    #[tokio::test]
    async fn test_fetch_with_quota_reports_status() {
        let router = Router::new().route("/games", get(|| async { StatusCode::NOT_FOUND }));
        let base = serve(router).await;
        let client = RawgClient::new(&config_for(&base));
        let err = client
            .fetch_with_quota(&format!("{}/games?key={}", base, TEST_KEY))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_missing_results_normalize_to_empty() {
        let client = RawgClient::new(&config_for(&serve(catalog_router(Hits::default())).await));
        let genres = client.genres().await;
        assert!(genres.is_live());
        assert!(genres.data().is_empty());
    }

    #[tokio::test]
    async fn test_entry_without_id_does_not_degrade_listing() {
        let router = Router::new().route(
            "/platforms",
            get(|| async {
                Json(page_json(vec![
                    serde_json::json!({"id": 4, "name": "PC"}),
                    serde_json::json!({"name": "Unknown"}),
                    serde_json::json!({"id": 187, "name": "PlayStation 5"}),
                ]))
            }),
        );
        let client = RawgClient::new(&config_for(&serve(router).await));
        let platforms = client.platforms().await;
        assert!(platforms.is_live());
        let ids: Vec<u64> = platforms.data().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4, 187]);
    }

    #[tokio::test]
    async fn test_games_by_genre_excludes_and_caps() {
        let client = RawgClient::new(&config_for(&serve(catalog_router(Hits::default())).await));
        let games = client.games_by_genre(4, Some(30)).await.into_inner();
        let ids: Vec<u64> = games.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![31, 32, 33, 34, 35, 36]);
    }

    #[tokio::test]
    async fn test_recommendations_pad_short_series() {
        let hits = Hits::default();
        let client = RawgClient::new(&config_for(&serve(catalog_router(hits.clone())).await));
        let recs = client.recommendations(10).await;
        assert!(recs.is_live());
        let ids: Vec<u64> = recs.data().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![20, 30, 31, 32, 33, 34]);
        // details, series, genre listing
        assert_eq!(hits.get(), 3);
    }
}
