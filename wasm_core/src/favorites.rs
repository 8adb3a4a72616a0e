//! Favorites list and the key-value storage it is persisted through.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, ToolError};

/// String storage under namespaced keys (browser `localStorage` on the JS side).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: String,
    pub title: String,
    pub href: String,
}

/// Ordered, unique-by-id list of favorite tools.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesStore {
    entries: Vec<FavoriteEntry>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the persisted list. Missing or unreadable data yields an empty list.
    pub fn hydrate(store: &impl KeyValueStore, key: &str) -> Self {
        let Some(raw) = store.get(key) else {
            return Self::default();
        };
        match Self::from_json(&raw) {
            Ok(favorites) => favorites,
            Err(err) => {
                warn!(key, error = %err, "discarding unreadable favorites");
                Self::default()
            }
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: Vec<FavoriteEntry> = serde_json::from_str(raw)
            .map_err(|err| ToolError::validation(format!("invalid favorites data: {err}")))?;
        let mut favorites = Self::default();
        for entry in entries {
            if !favorites.is_favorited(&entry.id) {
                favorites.entries.push(entry);
            }
        }
        Ok(favorites)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.entries).map_err(|err| ToolError::validation(err.to_string()))
    }

    pub fn flush(&self, store: &mut impl KeyValueStore, key: &str) -> Result<()> {
        store.set(key, self.to_json()?)
    }

    /// Adds `entry` or removes the entry with the same id. Returns true when now favorited.
    pub fn toggle(&mut self, entry: FavoriteEntry) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| e.id == entry.id) {
            self.entries.remove(pos);
            false
        } else {
            self.entries.push(entry);
            true
        }
    }

    pub fn is_favorited(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }
}
