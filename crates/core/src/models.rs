//! Catalog models as returned by the RAWG metadata API
//!
//! Every field tolerates absence: lists default to empty, optional numbers to
//! `None`, so a sparse or partially broken response still deserializes.

use chrono::{Datelike, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Treat an explicit JSON `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a list entry by entry, dropping entries that do not fit `T`
pub(crate) fn skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect())
}

/// Id/name pair used for genres, developers, publishers and ESRB ratings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
}

impl NamedRef {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            slug: slugify(name),
        }
    }
}

/// RAWG wraps every platform in a `{ "platform": {...} }` object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformGroup {
    #[serde(default)]
    pub platform: NamedRef,
}

impl PlatformGroup {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            platform: NamedRef::new(id, name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Screenshot {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// A game record. List endpoints fill the summary fields; the details
/// endpoint adds description, developers, publishers and website.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    /// Average user rating, 0-5
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default)]
    pub rating_top: Option<u32>,
    #[serde(default)]
    pub ratings_count: Option<u64>,
    /// Metacritic score, 0-100
    #[serde(default)]
    pub metacritic: Option<u32>,
    /// Average playtime in hours
    #[serde(default)]
    pub playtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parent_platforms: Vec<PlatformGroup>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub platforms: Vec<PlatformGroup>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_screenshots: Vec<Screenshot>,
    #[serde(default)]
    pub esrb_rating: Option<NamedRef>,
    #[serde(default)]
    pub achievements_count: Option<u32>,
    #[serde(default)]
    pub description_raw: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub developers: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publishers: Vec<NamedRef>,
    #[serde(default)]
    pub website: Option<String>,
}

impl Game {
    /// Release date, if present and well formed
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.released
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
    }

    /// Calendar year of the release date. Falls back to a leading four-digit
    /// year for partial dates such as `"2015"` or `"2015-05"`.
    pub fn release_year(&self) -> Option<i32> {
        if let Some(date) = self.release_date() {
            return Some(date.year());
        }
        let released = self.released.as_deref()?.trim();
        let year = released.get(..4)?;
        if year.chars().all(|c| c.is_ascii_digit()) {
            year.parse().ok()
        } else {
            None
        }
    }

    pub fn genre_ids(&self) -> HashSet<u64> {
        self.genres.iter().map(|g| g.id).collect()
    }

    /// Ids of the parent platform groups (PC, PlayStation, Xbox, ...)
    pub fn platform_ids(&self) -> HashSet<u64> {
        self.parent_platforms.iter().map(|p| p.platform.id).collect()
    }

    pub fn genre_names(&self) -> Vec<String> {
        self.genres.iter().map(|g| g.name.clone()).collect()
    }

    pub fn platform_names(&self) -> Vec<String> {
        self.parent_platforms
            .iter()
            .map(|p| p.platform.name.clone())
            .collect()
    }
}

/// RAWG's paginated envelope. Malformed entries in `results` are skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new", deserialize_with = "skip_invalid")]
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    /// Single-page envelope around an in-memory list
    pub fn from_results(results: Vec<T>) -> Self {
        Self {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        }
    }
}

/// Genre or platform as listed by the lookup endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub games_count: Option<u64>,
    #[serde(default)]
    pub image_background: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieData {
    #[serde(rename = "480", default)]
    pub low: Option<String>,
    #[serde(default)]
    pub max: Option<String>,
}

/// Trailer entry from `/games/{id}/movies`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub data: MovieData,
}

impl Movie {
    /// Best available video URL, highest quality first
    pub fn video_url(&self) -> Option<String> {
        self.data.max.clone().or_else(|| self.data.low.clone())
    }
}

/// Where a trailer was found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "kebab-case")]
pub enum Trailer {
    Rawg {
        id: u64,
        name: String,
        preview: Option<String>,
        video_url: Option<String>,
    },
    #[serde(rename = "youtube")]
    YouTube {
        id: String,
        title: String,
        thumbnail: Option<String>,
        embed_url: String,
    },
    #[serde(rename = "youtube-search")]
    YouTubeSearch { search_url: String },
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_tolerates_sparse_payload() {
        let game: Game = serde_json::from_str(
            r#"{"id": 3498, "name": "Grand Theft Auto V", "metacritic": null, "genres": null}"#,
        )
        .unwrap();
        assert_eq!(game.id, 3498);
        assert!(game.genres.is_empty());
        assert!(game.parent_platforms.is_empty());
        assert_eq!(game.metacritic, None);
        assert_eq!(game.rating, 0.0);
    }

    #[test]
    fn test_game_reads_nested_platforms() {
        let game: Game = serde_json::from_str(
            r#"{
                "id": 3328,
                "name": "The Witcher 3: Wild Hunt",
                "released": "2015-05-18",
                "rating": 4.66,
                "metacritic": 92,
                "genres": [{"id": 4, "name": "Action", "slug": "action"}],
                "parent_platforms": [{"platform": {"id": 1, "name": "PC", "slug": "pc"}}]
            }"#,
        )
        .unwrap();
        assert_eq!(game.release_year(), Some(2015));
        assert_eq!(game.genre_ids(), HashSet::from([4]));
        assert_eq!(game.platform_ids(), HashSet::from([1]));
        assert_eq!(game.platform_names(), vec!["PC".to_string()]);
    }

    #[test]
    fn test_release_year_partial_and_invalid() {
        let mut game = Game {
            released: Some("2019".into()),
            ..Default::default()
        };
        assert_eq!(game.release_year(), Some(2019));
        game.released = Some("TBA".into());
        assert_eq!(game.release_year(), None);
        game.released = None;
        assert_eq!(game.release_year(), None);
    }

    #[test]
    fn test_page_defaults_missing_results() {
        let page: Page<Game> = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_page_skips_entries_without_id() {
        let page: Page<Game> = serde_json::from_str(
            r#"{"count": 3, "results": [{"id": 1, "name": "A"}, {"name": "no id"}, {"id": 3}]}"#,
        )
        .unwrap();
        let ids: Vec<u64> = page.results.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let genres: Page<CatalogEntry> =
            serde_json::from_str(r#"{"results": [{"name": "Action"}, {"id": 4, "name": "Action"}]}"#).unwrap();
        assert_eq!(genres.results.len(), 1);

        let empty: Page<Game> = serde_json::from_str(r#"{"results": null}"#).unwrap();
        assert!(empty.results.is_empty());
    }

    #[test]
    fn test_trailer_source_tag() {
        let trailer = Trailer::YouTubeSearch {
            search_url: "https://www.youtube.com/results?search_query=x".into(),
        };
        let json = serde_json::to_value(&trailer).unwrap();
        assert_eq!(json["source"], "youtube-search");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(NamedRef::new(1, "Massively Multiplayer").slug, "massively-multiplayer");
        assert_eq!(NamedRef::new(2, "PC").slug, "pc");
    }
}
