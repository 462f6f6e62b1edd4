//! RAWG details enriched with an optional IGDB record

use serde::{Deserialize, Serialize};

use crate::models::Game;
use crate::providers::{IgdbGame, IgdbInvolvedCompany};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedScreenshot {
    pub id: u64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedVideo {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedGame {
    #[serde(flatten)]
    pub game: Game,
    pub summary: Option<String>,
    pub storyline: Option<String>,
    pub genre_names: Vec<String>,
    pub developer: String,
    pub publisher: String,
    pub screenshots: Vec<EnhancedScreenshot>,
    pub videos: Vec<EnhancedVideo>,
}

/// IGDB image URLs are protocol-relative thumbnails
fn full_size_image(url: &str) -> String {
    let url = url.replace("t_screenshot", "t_1080p");
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => url,
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

fn company_names(igdb: Option<&IgdbGame>, pick: fn(&IgdbInvolvedCompany) -> bool) -> Option<String> {
    igdb.map(|i| {
        join_names(
            i.involved_companies
                .iter()
                .filter(|c| pick(c))
                .map(|c| c.company.name.as_str()),
        )
    })
    .and_then(non_empty)
}

/// Merge RAWG details with IGDB data. An IGDB value only replaces the RAWG
/// one when it is present and non-empty.
pub fn merge_details(game: Game, igdb: Option<&IgdbGame>) -> EnhancedGame {
    let summary = igdb
        .and_then(|i| i.summary.clone())
        .and_then(non_empty)
        .or_else(|| game.description_raw.clone());

    let storyline = igdb.and_then(|i| i.storyline.clone()).and_then(non_empty);

    let genre_names = igdb
        .map(|i| i.genres.iter().map(|g| g.name.clone()).collect::<Vec<_>>())
        .filter(|names| !names.is_empty())
        .unwrap_or_else(|| game.genre_names());

    let developer = company_names(igdb, |c| c.developer)
        .unwrap_or_else(|| join_names(game.developers.iter().map(|d| d.name.as_str())));
    let publisher = company_names(igdb, |c| c.publisher)
        .unwrap_or_else(|| join_names(game.publishers.iter().map(|p| p.name.as_str())));

    let screenshots = match igdb.filter(|i| !i.screenshots.is_empty()) {
        Some(i) => i
            .screenshots
            .iter()
            .map(|s| EnhancedScreenshot {
                id: s.id,
                url: full_size_image(&s.url),
            })
            .collect(),
        None => game
            .short_screenshots
            .iter()
            .map(|s| EnhancedScreenshot {
                id: s.id,
                url: s.image.clone(),
            })
            .collect(),
    };

    let videos = igdb
        .map(|i| {
            i.videos
                .iter()
                .map(|v| EnhancedVideo {
                    id: v.video_id.clone(),
                    name: v.name.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    EnhancedGame {
        game,
        summary,
        storyline,
        genre_names,
        developer,
        publisher,
        screenshots,
        videos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::mock_game_details;
    use crate::providers::{IgdbImage, IgdbNamed, IgdbVideo};

    #[test]
    fn test_rawg_only_merge() {
        let merged = merge_details(mock_game_details(3), None);
        assert_eq!(merged.summary, mock_game_details(3).description_raw);
        assert_eq!(merged.genre_names, vec!["Puzzle".to_string()]);
        assert_eq!(merged.developer, "Demo Studio");
        assert_eq!(merged.publisher, "Demo Publisher");
        assert!(merged.videos.is_empty());
        assert!(merged.storyline.is_none());
    }

    #[test]
    fn test_igdb_values_override_when_present() {
        let igdb = IgdbGame {
            name: "Portal 2".into(),
            summary: Some("Sequel to Portal.".into()),
            storyline: Some("   ".into()),
            involved_companies: vec![
                IgdbInvolvedCompany {
                    company: IgdbNamed { id: 1, name: "Valve".into() },
                    developer: true,
                    publisher: true,
                },
                IgdbInvolvedCompany {
                    company: IgdbNamed { id: 2, name: "Electronic Arts".into() },
                    developer: false,
                    publisher: true,
                },
            ],
            screenshots: vec![IgdbImage {
                id: 7,
                url: "//images.igdb.com/igdb/image/upload/t_screenshot/abc.jpg".into(),
            }],
            videos: vec![IgdbVideo {
                video_id: "tax4e4hBBZc".into(),
                name: Some("Trailer".into()),
            }],
            ..Default::default()
        };
        let merged = merge_details(mock_game_details(3), Some(&igdb));
        assert_eq!(merged.summary.as_deref(), Some("Sequel to Portal."));
        assert!(merged.storyline.is_none());
        // No IGDB genres, RAWG genres are kept
        assert_eq!(merged.genre_names, vec!["Puzzle".to_string()]);
        assert_eq!(merged.developer, "Valve");
        assert_eq!(merged.publisher, "Valve, Electronic Arts");
        assert_eq!(
            merged.screenshots[0].url,
            "https://images.igdb.com/igdb/image/upload/t_1080p/abc.jpg"
        );
        assert_eq!(merged.videos[0].id, "tax4e4hBBZc");
    }
}
