//! Configuration management using config.toml

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use game_library_core::constants::{MAX_REQUESTS_PER_WINDOW, QUOTA_WINDOW, RECOMMENDATION_TTL};

use crate::error::Result;

const CONFIG_PATH: &str = "config.toml";

/// Placeholder shipped in example configs
const PLACEHOLDER_KEY: &str = "YOUR_RAWG_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// RAWG API key (https://rawg.io/apidocs)
    #[serde(default)]
    pub rawg_api_key: String,

    /// YouTube Data API key, used for trailer search when RAWG has none
    #[serde(default)]
    pub youtube_api_key: Option<String>,

    #[serde(default = "default_rawg_base_url")]
    pub rawg_base_url: String,

    #[serde(default = "default_cheapshark_base_url")]
    pub cheapshark_base_url: String,

    #[serde(default = "default_freetogame_base_url")]
    pub freetogame_base_url: String,

    #[serde(default = "default_steam_store_base_url")]
    pub steam_store_base_url: String,

    #[serde(default = "default_steamspy_base_url")]
    pub steamspy_base_url: String,

    /// Local proxy forwarding IGDB queries
    #[serde(default = "default_igdb_proxy_url")]
    pub igdb_proxy_url: String,

    #[serde(default = "default_youtube_search_url")]
    pub youtube_search_url: String,

    /// RAWG requests allowed per quota window (default: 40)
    #[serde(default = "default_max_requests_per_window")]
    pub max_requests_per_window: usize,

    /// Quota window length in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Recommendation cache lifetime in seconds (default: 300)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Request timeout for the keyless providers in seconds (default: 30)
    #[serde(default = "default_companion_timeout_secs")]
    pub companion_timeout_secs: u64,

    /// Hold the quota lock across the backoff so concurrent callers can
    /// never exceed the window
    #[serde(default)]
    pub strict_quota: bool,

    /// Where local_storage.json lives (None = platform data directory)
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
}

fn default_rawg_base_url() -> String {
    "https://api.rawg.io/api".to_string()
}

fn default_cheapshark_base_url() -> String {
    "https://www.cheapshark.com/api/1.0".to_string()
}

fn default_freetogame_base_url() -> String {
    "https://www.freetogame.com/api".to_string()
}

fn default_steam_store_base_url() -> String {
    "https://store.steampowered.com/api".to_string()
}

fn default_steamspy_base_url() -> String {
    "https://steamspy.com/api.php".to_string()
}

fn default_igdb_proxy_url() -> String {
    "http://localhost:3001/igdb".to_string()
}

fn default_youtube_search_url() -> String {
    "https://www.googleapis.com/youtube/v3/search".to_string()
}

fn default_max_requests_per_window() -> usize {
    MAX_REQUESTS_PER_WINDOW
}

fn default_window_secs() -> u64 {
    QUOTA_WINDOW.as_secs()
}

fn default_cache_ttl_secs() -> u64 {
    RECOMMENDATION_TTL.as_secs()
}

fn default_companion_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rawg_api_key: String::new(),
            youtube_api_key: None,
            rawg_base_url: default_rawg_base_url(),
            cheapshark_base_url: default_cheapshark_base_url(),
            freetogame_base_url: default_freetogame_base_url(),
            steam_store_base_url: default_steam_store_base_url(),
            steamspy_base_url: default_steamspy_base_url(),
            igdb_proxy_url: default_igdb_proxy_url(),
            youtube_search_url: default_youtube_search_url(),
            max_requests_per_window: default_max_requests_per_window(),
            window_secs: default_window_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            companion_timeout_secs: default_companion_timeout_secs(),
            strict_quota: false,
            storage_dir: None,
        }
    }
}

impl Config {
    /// Load config.toml from the working directory, creating a default one
    /// if it doesn't exist, then apply `.env` / environment overrides
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        let mut config = match Self::load_from(CONFIG_PATH) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("{}", e);
                Config::default()
            }
        };
        config.apply_env();
        config
    }

    /// Read a config file, writing the defaults there when it is missing
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::read(path);
        }
        let config = Config::default();
        if let Err(e) = config.save_to(path) {
            tracing::warn!("Could not create {}: {}", path.display(), e);
        }
        Ok(config)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// RAWG_API_KEY and YOUTUBE_API_KEY take precedence over the file
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("RAWG_API_KEY") {
            if !key.trim().is_empty() {
                self.rawg_api_key = key.trim().to_string();
            }
        }
        if let Ok(key) = std::env::var("YOUTUBE_API_KEY") {
            if !key.trim().is_empty() {
                self.youtube_api_key = Some(key.trim().to_string());
            }
        }
    }

    /// A key counts as configured when it is set, is not the placeholder and
    /// looks long enough to be real
    pub fn is_api_key_configured(&self) -> bool {
        let key = self.rawg_api_key.trim();
        !key.is_empty() && key != PLACEHOLDER_KEY && key.len() > 10
    }

    pub fn youtube_key(&self) -> Option<&str> {
        self.youtube_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn quota_window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn companion_timeout(&self) -> Duration {
        Duration::from_secs(self.companion_timeout_secs)
    }

    /// Path of local_storage.json
    pub fn storage_path(&self) -> PathBuf {
        let dir = match &self.storage_dir {
            Some(dir) => dir.clone(),
            None => ProjectDirs::from("", "", "GameLibrary")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        dir.join("local_storage.json")
    }
}
