//! Live-or-degraded results and the built-in demo catalog
//!
//! Provider calls never fail the caller outright. When the API key is absent
//! or a request fails, the client substitutes a small fixed dataset and tags
//! the result as [`Fetched::Degraded`] so callers can tell demo data apart.

use std::fmt;

use crate::models::{Game, NamedRef, PlatformGroup};
use crate::providers::FreeGame;

/// Why a result is not live provider data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    /// No usable API key is configured; no request was issued
    MissingApiKey,
    /// The provider rejected the key (HTTP 401)
    Unauthorized,
    /// The request failed for any other reason
    RequestFailed(String),
}

impl fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradeReason::MissingApiKey => write!(f, "API key not configured"),
            DegradeReason::Unauthorized => write!(f, "API key is invalid or missing"),
            DegradeReason::RequestFailed(e) => write!(f, "request failed: {}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Live(T),
    Degraded { data: T, reason: DegradeReason },
}

impl<T> Fetched<T> {
    pub fn degraded(data: T, reason: DegradeReason) -> Self {
        Fetched::Degraded { data, reason }
    }

    /// Rebuild from data plus the first degradation seen while assembling it
    pub fn from_parts(data: T, reason: Option<DegradeReason>) -> Self {
        match reason {
            Some(reason) => Fetched::Degraded { data, reason },
            None => Fetched::Live(data),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Fetched::Live(_))
    }

    pub fn is_degraded(&self) -> bool {
        !self.is_live()
    }

    pub fn data(&self) -> &T {
        match self {
            Fetched::Live(data) | Fetched::Degraded { data, .. } => data,
        }
    }

    pub fn reason(&self) -> Option<&DegradeReason> {
        match self {
            Fetched::Live(_) => None,
            Fetched::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Fetched::Live(data) | Fetched::Degraded { data, .. } => data,
        }
    }

    pub fn split(self) -> (T, Option<DegradeReason>) {
        match self {
            Fetched::Live(data) => (data, None),
            Fetched::Degraded { data, reason } => (data, Some(reason)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Live(data) => Fetched::Live(f(data)),
            Fetched::Degraded { data, reason } => Fetched::Degraded {
                data: f(data),
                reason,
            },
        }
    }
}

// ============================================================================
// Demo catalog
// ============================================================================

const ACTION: (u64, &str) = (4, "Action");
const ADVENTURE: (u64, &str) = (3, "Adventure");
const RPG: (u64, &str) = (5, "RPG");
const PUZZLE: (u64, &str) = (7, "Puzzle");
const INDIE: (u64, &str) = (51, "Indie");

const PC: (u64, &str) = (1, "PC");
const PLAYSTATION: (u64, &str) = (2, "PlayStation");
const XBOX: (u64, &str) = (3, "Xbox");
const NINTENDO: (u64, &str) = (7, "Nintendo");

fn mock_game(
    id: u64,
    name: &str,
    released: &str,
    rating: f64,
    image: &str,
    platforms: &[(u64, &str)],
    genres: &[(u64, &str)],
) -> Game {
    Game {
        id,
        slug: NamedRef::new(id, name).slug,
        name: name.to_string(),
        released: Some(released.to_string()),
        background_image: Some(format!("https://media.rawg.io/media/games/{}", image)),
        rating,
        parent_platforms: platforms
            .iter()
            .map(|(pid, pname)| PlatformGroup::new(*pid, pname))
            .collect(),
        genres: genres
            .iter()
            .map(|(gid, gname)| NamedRef::new(*gid, gname))
            .collect(),
        ..Default::default()
    }
}

/// The fixed demo catalog
pub fn mock_games() -> Vec<Game> {
    vec![
        mock_game(1, "The Witcher 3: Wild Hunt", "2015-05-18", 4.66,
            "618/618c2031a07bbff6b4f611f10b6f2f85.jpg", &[PC, PLAYSTATION], &[RPG, ACTION]),
        mock_game(2, "Grand Theft Auto V", "2013-09-17", 4.47,
            "456/456dea5e1c7e3cd07060c14e96612001.jpg", &[PC, XBOX], &[ACTION, ADVENTURE]),
        mock_game(3, "Portal 2", "2011-04-18", 4.61,
            "328/3283617cb7d75d67257fc58339188571.jpg", &[PC, PLAYSTATION], &[PUZZLE]),
        mock_game(4, "Red Dead Redemption 2", "2018-10-26", 4.59,
            "511/5118aff5091cb3efec399c808f8c598f.jpg", &[PC, XBOX], &[ACTION, ADVENTURE]),
        mock_game(5, "God of War (2018)", "2018-04-20", 4.58,
            "4be/4be6a6ad0364751a96229c56bf69be59.jpg", &[PC, PLAYSTATION], &[ACTION, ADVENTURE]),
        mock_game(6, "Elden Ring", "2022-02-25", 4.45,
            "b29/b294fdd866dcdb643e7bab370a552855.jpg", &[PC, PLAYSTATION], &[RPG, ACTION]),
        mock_game(7, "Cyberpunk 2077", "2020-12-10", 4.15,
            "26d/26d4437715bee60138dab4a7c8c59c92.jpg", &[PC, XBOX], &[RPG, ACTION]),
        mock_game(8, "Hades", "2020-09-17", 4.52,
            "1f4/1f47a270b8f241e4676b14d39ec620f7.jpg", &[PC, NINTENDO], &[ACTION, INDIE]),
    ]
}

/// Demo games whose name contains `query`, case-insensitively
pub fn search_mock_games(query: &str) -> Vec<Game> {
    let needle = query.to_lowercase();
    mock_games()
        .into_iter()
        .filter(|g| g.name.to_lowercase().contains(&needle))
        .collect()
}

/// Detail record for a demo game. Unknown ids fall back to the first entry.
pub fn mock_game_details(id: u64) -> Game {
    let mut games = mock_games();
    let index = games.iter().position(|g| g.id == id).unwrap_or(0);
    let mut game = games.swap_remove(index);
    game.description_raw = Some(format!(
        "{} is an amazing game that has captivated millions of players worldwide. \
         Experience incredible gameplay, stunning graphics, and an unforgettable story.",
        game.name
    ));
    game.developers = vec![NamedRef::new(0, "Demo Studio")];
    game.publishers = vec![NamedRef::new(0, "Demo Publisher")];
    game.platforms = game.parent_platforms.clone();
    game
}

/// Free-to-play titles shown when FreeToGame is unreachable
pub fn mock_free_games() -> Vec<FreeGame> {
    [
        (1, "Fortnite", "Battle Royale"),
        (2, "League of Legends", "MOBA"),
        (3, "Valorant", "Shooter"),
    ]
    .into_iter()
    .map(|(id, title, genre)| FreeGame {
        id,
        title: title.to_string(),
        genre: genre.to_string(),
        platform: "PC".to_string(),
        thumbnail: format!("https://www.freetogame.com/g/{}/thumbnail.jpg", id),
        ..Default::default()
    })
    .collect()
}
