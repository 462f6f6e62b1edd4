//! Side-by-side comparison of up to four games

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{COMPARISON_SLOTS, MAX_COMPARISON_SLOTS};
use crate::error::CoreError;
use crate::models::Game;

/// Persisted form of an occupied slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRow {
    pub name: &'static str,
    pub values: Vec<String>,
    /// Index into [`ComparisonData::games`] of the best value, if any is positive
    pub highlight: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonData {
    pub games: Vec<Game>,
    pub attributes: Vec<AttributeRow>,
}

struct Attribute {
    name: &'static str,
    format: fn(&Game) -> String,
    /// Numeric value for "highest wins" attributes
    rank: Option<fn(&Game) -> f64>,
}

const NOT_AVAILABLE: &str = "N/A";

fn or_na(value: String) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value
    }
}

fn format_rating(g: &Game) -> String {
    if g.rating > 0.0 {
        format!("⭐ {:.2}/5", g.rating)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

fn format_metacritic(g: &Game) -> String {
    match g.metacritic {
        Some(m) if m > 0 => format!("{}/100", m),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn format_released(g: &Game) -> String {
    match g.release_date() {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => "TBA".to_string(),
    }
}

fn format_genres(g: &Game) -> String {
    or_na(g.genre_names().join(", "))
}

fn format_platforms(g: &Game) -> String {
    or_na(g.platform_names().join(", "))
}

fn format_playtime(g: &Game) -> String {
    match g.playtime {
        Some(h) if h > 0 => format!("{} hours", h),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn format_esrb(g: &Game) -> String {
    g.esrb_rating
        .as_ref()
        .map(|r| r.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Not Rated".to_string())
}

fn format_achievements(g: &Game) -> String {
    match g.achievements_count {
        Some(n) if n > 0 => format!("{} achievements", n),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn rating_value(g: &Game) -> f64 {
    g.rating
}

fn metacritic_value(g: &Game) -> f64 {
    f64::from(g.metacritic.unwrap_or(0))
}

fn achievements_value(g: &Game) -> f64 {
    f64::from(g.achievements_count.unwrap_or(0))
}

const ATTRIBUTES: &[Attribute] = &[
    Attribute { name: "Rating", format: format_rating, rank: Some(rating_value) },
    Attribute { name: "Metacritic", format: format_metacritic, rank: Some(metacritic_value) },
    Attribute { name: "Release Date", format: format_released, rank: None },
    Attribute { name: "Genres", format: format_genres, rank: None },
    Attribute { name: "Platforms", format: format_platforms, rank: None },
    Attribute { name: "Playtime", format: format_playtime, rank: None },
    Attribute { name: "ESRB Rating", format: format_esrb, rank: None },
    Attribute { name: "Achievements", format: format_achievements, rank: Some(achievements_value) },
];

/// First index holding the maximum, provided that maximum is positive
fn highest(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.iter().copied().enumerate() {
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.filter(|(_, v)| *v > 0.0).map(|(i, _)| i)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSlots {
    slots: Vec<Option<Game>>,
}

impl Default for ComparisonSlots {
    fn default() -> Self {
        Self {
            slots: vec![None; COMPARISON_SLOTS],
        }
    }
}

impl ComparisonSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a game into the first empty slot and return its index
    pub fn add(&mut self, game: Game) -> Result<usize, CoreError> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(CoreError::ComparisonFull)?;
        if self.contains(game.id) {
            return Err(CoreError::AlreadyInComparison);
        }
        self.slots[index] = Some(game);
        Ok(index)
    }

    /// Put a game into a specific slot, replacing whatever was there.
    /// Refused when the index is out of range or another slot holds the game.
    pub fn place(&mut self, index: usize, game: Game) -> bool {
        let elsewhere = self
            .slots
            .iter()
            .enumerate()
            .any(|(i, slot)| i != index && slot.as_ref().is_some_and(|g| g.id == game.id));
        if elsewhere {
            return false;
        }
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(game);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    /// Add one more empty slot, up to the maximum
    pub fn add_slot(&mut self) -> bool {
        if self.slots.len() >= MAX_COMPARISON_SLOTS {
            return false;
        }
        self.slots.push(None);
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn contains(&self, id: u64) -> bool {
        self.slots.iter().flatten().any(|g| g.id == id)
    }

    pub fn slots(&self) -> &[Option<Game>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Occupied slots in order
    pub fn games(&self) -> Vec<&Game> {
        self.slots.iter().flatten().collect()
    }

    /// Attribute table for the occupied slots. Needs at least two games.
    pub fn comparison_data(&self) -> Option<ComparisonData> {
        let games: Vec<Game> = self.games().into_iter().cloned().collect();
        if games.len() < 2 {
            return None;
        }
        let attributes = ATTRIBUTES
            .iter()
            .map(|attr| AttributeRow {
                name: attr.name,
                values: games.iter().map(attr.format).collect(),
                highlight: attr.rank.and_then(|rank| {
                    let values: Vec<f64> = games.iter().map(rank).collect();
                    highest(&values)
                }),
            })
            .collect();
        Some(ComparisonData { games, attributes })
    }

    /// Attribute name to the name of the game that wins it
    pub fn winners(&self) -> Option<BTreeMap<&'static str, String>> {
        let data = self.comparison_data()?;
        Some(
            data.attributes
                .iter()
                .filter_map(|row| {
                    let index = row.highlight?;
                    Some((row.name, data.games.get(index)?.name.clone()))
                })
                .collect(),
        )
    }

    pub fn snapshot(&self) -> Vec<Option<SlotRef>> {
        self.slots
            .iter()
            .map(|slot| {
                slot.as_ref().map(|g| SlotRef {
                    id: g.id,
                    name: g.name.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::mock_games;

    fn slots_with(ids: &[u64]) -> ComparisonSlots {
        let mut slots = ComparisonSlots::new();
        for game in mock_games().into_iter().filter(|g| ids.contains(&g.id)) {
            slots.add(game).unwrap();
        }
        slots
    }

    #[test]
    fn test_add_fills_first_empty_slot() {
        let mut slots = slots_with(&[1, 2]);
        slots.remove(0);
        let games = mock_games();
        assert_eq!(slots.add(games[2].clone()), Ok(0));
        assert_eq!(slots.add(games[1].clone()), Err(CoreError::AlreadyInComparison));
        assert_eq!(slots.add(games[3].clone()), Ok(2));
        assert_eq!(slots.add(games[4].clone()), Err(CoreError::ComparisonFull));
        assert!(slots.add_slot());
        assert!(!slots.add_slot());
        assert_eq!(slots.add(games[4].clone()), Ok(3));
    }

    #[test]
    fn test_full_is_reported_before_duplicate() {
        let mut slots = slots_with(&[1, 2, 3]);
        assert_eq!(slots.add(mock_games()[0].clone()), Err(CoreError::ComparisonFull));
    }

    #[test]
    fn test_comparison_needs_two_games() {
        let slots = slots_with(&[1]);
        assert!(slots.comparison_data().is_none());
        assert!(slots.winners().is_none());
    }

    #[test]
    fn test_comparison_rows_and_winners() {
        let mut slots = slots_with(&[3, 1]);
        let data = slots.comparison_data().unwrap();
        assert_eq!(data.attributes.len(), 8);

        let rating = &data.attributes[0];
        assert_eq!(rating.values, vec!["⭐ 4.66/5", "⭐ 4.61/5"]);
        assert_eq!(rating.highlight, Some(0));

        // Neither game has a metacritic score
        assert_eq!(data.attributes[1].highlight, None);
        assert_eq!(data.attributes[2].values[0], "May 18, 2015");
        assert_eq!(data.attributes[6].values[0], "Not Rated");

        let winners = slots.winners().unwrap();
        assert_eq!(winners.get("Rating").map(String::as_str), Some("The Witcher 3: Wild Hunt"));
        assert!(!winners.contains_key("Metacritic"));

        slots.clear();
        assert_eq!(slots.len(), COMPARISON_SLOTS);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_snapshot_keeps_empty_slots() {
        let mut slots = slots_with(&[8]);
        slots.remove(0);
        slots.place(1, mock_games()[7].clone());
        let snapshot = slots.snapshot();
        assert_eq!(
            snapshot,
            vec![None, Some(SlotRef { id: 8, name: "Hades".into() }), None]
        );
    }

    #[test]
    fn test_place_refuses_game_held_by_another_slot() {
        let hades = mock_games()[7].clone();
        let mut slots = ComparisonSlots::new();
        assert!(slots.place(0, hades.clone()));
        assert!(!slots.place(2, hades.clone()));
        assert!(slots.place(0, hades));
        assert!(!slots.place(5, mock_games()[0].clone()));
        assert_eq!(slots.games().len(), 1);
    }
}
