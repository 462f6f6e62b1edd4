//! File-backed key/value storage for the wishlist and the comparison slots

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use game_library_core::{ComparisonSlots, SlotRef, Wishlist, WishlistEntry};

use crate::config::Config;
use crate::error::Result;
use crate::rawg::RawgClient;

pub const WISHLIST_KEY: &str = "gameLibrary_wishlist";
pub const COMPARISON_KEY: &str = "gameComparison";

/// String values keyed by name, written through to a JSON file on every change
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl LocalStorage {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring unreadable storage file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, items }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::open(config.storage_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.items.insert(key.to_string(), value.into());
        self.flush()
    }

    pub fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.flush()
    }

    /// Decoded value under `key`. Missing or unparsable values give the default.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(raw) = self.get_item(key) else {
            return T::default();
        };
        serde_json::from_str(raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "Discarding unparsable stored value");
            T::default()
        })
    }

    pub fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, raw)
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.items)?)?;
        Ok(())
    }
}

/// The wishlist, saved after every change
#[derive(Debug)]
pub struct WishlistStore {
    storage: LocalStorage,
    wishlist: Wishlist,
}

impl WishlistStore {
    pub fn new(storage: LocalStorage) -> Self {
        let wishlist = storage.load(WISHLIST_KEY);
        Self { storage, wishlist }
    }

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut LocalStorage {
        &mut self.storage
    }

    pub fn add(&mut self, entry: WishlistEntry) -> Result<bool> {
        let added = self.wishlist.add(entry);
        self.persist()?;
        Ok(added)
    }

    pub fn remove(&mut self, id: u64) -> Result<bool> {
        let removed = self.wishlist.remove(id);
        self.persist()?;
        Ok(removed)
    }

    /// Returns true if the game is now on the wishlist
    pub fn toggle(&mut self, entry: WishlistEntry) -> Result<bool> {
        let now_listed = self.wishlist.toggle(entry);
        self.persist()?;
        Ok(now_listed)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.wishlist.contains(id)
    }

    fn persist(&mut self) -> Result<()> {
        self.storage.save(WISHLIST_KEY, &self.wishlist)
    }
}

pub fn save_comparison(storage: &mut LocalStorage, slots: &ComparisonSlots) -> Result<()> {
    storage.save(COMPARISON_KEY, &slots.snapshot())
}

/// Rebuild the comparison from its snapshot, fetching fresh details for
/// every stored id. Slots whose details come back for another game, or that
/// repeat a game already restored, stay empty.
pub async fn restore_comparison(storage: &LocalStorage, rawg: &RawgClient) -> ComparisonSlots {
    let snapshot: Vec<Option<SlotRef>> = storage.load(COMPARISON_KEY);
    let mut slots = ComparisonSlots::new();
    while slots.len() < snapshot.len() && slots.add_slot() {}

    for (index, slot) in snapshot.into_iter().enumerate() {
        let Some(slot) = slot else { continue };
        if slots.contains(slot.id) {
            debug!(id = slot.id, "Skipping repeated comparison game");
            continue;
        }
        let game = rawg.game_details(slot.id).await.into_inner();
        if game.id == slot.id {
            slots.place(index, game);
        } else {
            debug!(id = slot.id, name = %slot.name, "Stored comparison game not restored");
        }
    }
    slots
}
