use serde::{Deserialize, Serialize};

use crate::models::Game;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub background_image: Option<String>,
}

impl From<&Game> for WishlistEntry {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id,
            name: game.name.clone(),
            background_image: game.background_image.clone(),
        }
    }
}

/// Saved games, unique by id, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<WishlistEntry>", from = "Vec<WishlistEntry>")]
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
}

/// Keeps the first entry for each id
impl From<Vec<WishlistEntry>> for Wishlist {
    fn from(entries: Vec<WishlistEntry>) -> Self {
        let mut wishlist = Self::new();
        for entry in entries {
            wishlist.add(entry);
        }
        wishlist
    }
}

impl From<Wishlist> for Vec<WishlistEntry> {
    fn from(wishlist: Wishlist) -> Self {
        wishlist.entries
    }
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the game was already saved
    pub fn add(&mut self, entry: WishlistEntry) -> bool {
        if self.contains(entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Add if absent, remove if present. Returns whether the game is now saved.
    pub fn toggle(&mut self, entry: WishlistEntry) -> bool {
        if self.remove(entry.id) {
            false
        } else {
            self.entries.push(entry);
            true
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
