//! Catalog filter state: selected platforms and genres, sort order, search text

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::models::Game;

/// RAWG `ordering` values. Unknown strings are passed through to the API
/// and leave client-side order untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SortKey {
    #[default]
    RatingDesc,
    RatingAsc,
    ReleasedDesc,
    ReleasedAsc,
    NameAsc,
    NameDesc,
    MetacriticDesc,
    Other(String),
}

impl SortKey {
    pub fn as_str(&self) -> &str {
        match self {
            SortKey::RatingDesc => "-rating",
            SortKey::RatingAsc => "rating",
            SortKey::ReleasedDesc => "-released",
            SortKey::ReleasedAsc => "released",
            SortKey::NameAsc => "name",
            SortKey::NameDesc => "-name",
            SortKey::MetacriticDesc => "-metacritic",
            SortKey::Other(s) => s,
        }
    }

    fn compare(&self, a: &Game, b: &Game) -> Ordering {
        match self {
            SortKey::RatingDesc => b.rating.total_cmp(&a.rating),
            SortKey::RatingAsc => a.rating.total_cmp(&b.rating),
            // Undated games sort last either way
            SortKey::ReleasedDesc => match (a.release_date(), b.release_date()) {
                (Some(x), Some(y)) => y.cmp(&x),
                (x, y) => x.is_none().cmp(&y.is_none()),
            },
            SortKey::ReleasedAsc => match (a.release_date(), b.release_date()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (x, y) => x.is_none().cmp(&y.is_none()),
            },
            SortKey::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
            SortKey::MetacriticDesc => b.metacritic.unwrap_or(0).cmp(&a.metacritic.unwrap_or(0)),
            SortKey::Other(_) => Ordering::Equal,
        }
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-rating" => SortKey::RatingDesc,
            "rating" => SortKey::RatingAsc,
            "-released" => SortKey::ReleasedDesc,
            "released" => SortKey::ReleasedAsc,
            "name" => SortKey::NameAsc,
            "-name" => SortKey::NameDesc,
            "-metacritic" => SortKey::MetacriticDesc,
            other => SortKey::Other(other.to_string()),
        })
    }
}

impl From<String> for SortKey {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(key) => key,
            Err(never) => match never {},
        }
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_string()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameFilter {
    pub platforms: BTreeSet<u64>,
    pub genres: BTreeSet<u64>,
    pub ordering: SortKey,
    pub search: String,
}

impl GameFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select or deselect a parent platform. Returns whether it is now selected.
    pub fn toggle_platform(&mut self, id: u64) -> bool {
        toggle(&mut self.platforms, id)
    }

    /// Select or deselect a genre. Returns whether it is now selected.
    pub fn toggle_genre(&mut self, id: u64) -> bool {
        toggle(&mut self.genres, id)
    }

    pub fn set_ordering(&mut self, ordering: SortKey) {
        self.ordering = ordering;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty() && self.genres.is_empty() && self.search.trim().is_empty()
    }

    /// Query parameters for the RAWG `/games` endpoint
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if !self.platforms.is_empty() {
            params.push(("parent_platforms".to_string(), join_ids(&self.platforms)));
        }
        if !self.genres.is_empty() {
            params.push(("genres".to_string(), join_ids(&self.genres)));
        }
        params.push(("ordering".to_string(), self.ordering.as_str().to_string()));
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search".to_string(), search.to_string()));
        }
        params
    }

    /// Filter and sort an in-memory list the same way the API would
    pub fn apply(&self, games: &[Game]) -> Vec<Game> {
        let needle = self.search.trim().to_lowercase();
        let mut matched: Vec<Game> = games
            .iter()
            .filter(|g| {
                self.platforms.is_empty()
                    || g.platform_ids().iter().any(|id| self.platforms.contains(id))
            })
            .filter(|g| {
                self.genres.is_empty() || g.genre_ids().iter().any(|id| self.genres.contains(id))
            })
            .filter(|g| needle.is_empty() || g.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matched.sort_by(|a, b| self.ordering.compare(a, b));
        matched
    }
}

fn toggle(set: &mut BTreeSet<u64>, id: u64) -> bool {
    if set.remove(&id) {
        false
    } else {
        set.insert(id);
        true
    }
}

fn join_ids(ids: &BTreeSet<u64>) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
