//! Application-scoped state handed to the UI shell: theme, locale, favorites.
//!
//! State is hydrated from a [`KeyValueStore`] once at construction and flushed
//! back after every mutation.
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ToolkitConfig;
use crate::error::{Result, ToolError};
use crate::favorites::{FavoriteEntry, FavoritesStore, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Preferences {
    theme: Theme,
    locale: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            locale: "en".into(),
        }
    }
}

/// Accepts language tags shaped like `en`, `pt-BR` or `zh-Hant-TW`.
pub fn is_valid_locale(tag: &str) -> bool {
    let mut parts = tag.split('-');
    let Some(language) = parts.next() else {
        return false;
    };
    (2..=3).contains(&language.len())
        && language.bytes().all(|b| b.is_ascii_alphabetic())
        && parts.all(|p| (2..=8).contains(&p.len()) && p.bytes().all(|b| b.is_ascii_alphanumeric()))
}

pub struct AppState<S: KeyValueStore> {
    store: S,
    config: ToolkitConfig,
    preferences: Preferences,
    favorites: FavoritesStore,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn hydrate(store: S, config: ToolkitConfig) -> Result<Self> {
        config.validate()?;
        let favorites = FavoritesStore::hydrate(&store, &config.favorites_key);
        let preferences = store
            .get(&config.state_key)
            .and_then(|raw| match serde_json::from_str::<Preferences>(&raw) {
                Ok(prefs) => Some(prefs),
                Err(err) => {
                    warn!(key = %config.state_key, error = %err, "discarding unreadable preferences");
                    None
                }
            })
            .unwrap_or_default();
        Ok(Self {
            store,
            config,
            preferences,
            favorites,
        })
    }

    pub fn theme(&self) -> Theme {
        self.preferences.theme
    }

    pub fn locale(&self) -> &str {
        &self.preferences.locale
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        let next = Preferences {
            theme,
            ..self.preferences.clone()
        };
        self.commit_preferences(next)
    }

    pub fn set_locale(&mut self, locale: &str) -> Result<()> {
        if !is_valid_locale(locale) {
            return Err(ToolError::validation(format!("invalid locale tag: {locale}")));
        }
        let next = Preferences {
            locale: locale.to_string(),
            ..self.preferences.clone()
        };
        self.commit_preferences(next)
    }

    /// Toggles `entry`; memory only changes once the store accepted the new list.
    pub fn toggle_favorite(&mut self, entry: FavoriteEntry) -> Result<bool> {
        let mut next = self.favorites.clone();
        let favorited = next.toggle(entry);
        next.flush(&mut self.store, &self.config.favorites_key)?;
        self.favorites = next;
        Ok(favorited)
    }

    pub fn is_favorited(&self, id: &str) -> bool {
        self.favorites.is_favorited(id)
    }

    fn commit_preferences(&mut self, next: Preferences) -> Result<()> {
        let raw = serde_json::to_string(&next)
            .map_err(|err| ToolError::validation(err.to_string()))?;
        self.store.set(&self.config.state_key, raw)?;
        self.preferences = next;
        Ok(())
    }

    /// Returns the backing store, e.g. to hand storage back on teardown.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::MemoryStore;

    fn entry() -> FavoriteEntry {
        FavoriteEntry {
            id: "base64".into(),
            title: "Base64".into(),
            href: "/base64".into(),
        }
    }

    #[test]
    fn fresh_state_has_defaults() {
        let state = AppState::hydrate(MemoryStore::new(), ToolkitConfig::default()).unwrap();
        assert_eq!(state.theme(), Theme::System);
        assert_eq!(state.locale(), "en");
        assert!(state.favorites().entries().is_empty());
    }

    #[test]
    fn mutations_flush_and_rehydrate() {
        let mut state = AppState::hydrate(MemoryStore::new(), ToolkitConfig::default()).unwrap();
        state.set_theme(Theme::Dark).unwrap();
        state.set_locale("pt-BR").unwrap();
        assert!(state.toggle_favorite(entry()).unwrap());
        let store = state.into_store();
        let restored = AppState::hydrate(store, ToolkitConfig::default()).unwrap();
        assert_eq!(restored.theme(), Theme::Dark);
        assert_eq!(restored.locale(), "pt-BR");
        assert!(restored.is_favorited("base64"));
    }

    #[test]
    fn rejects_malformed_locale() {
        let mut state = AppState::hydrate(MemoryStore::new(), ToolkitConfig::default()).unwrap();
        assert!(state.set_locale("english!").is_err());
        assert!(state.set_locale("").is_err());
        assert_eq!(state.locale(), "en");
    }

    struct FullStore;

    impl KeyValueStore for FullStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: String) -> Result<()> {
            Err(ToolError::configuration("quota exceeded"))
        }
    }

    #[test]
    fn failed_writes_leave_state_untouched() {
        let mut state = AppState::hydrate(FullStore, ToolkitConfig::default()).unwrap();
        assert!(state.toggle_favorite(entry()).is_err());
        assert!(!state.is_favorited("base64"));
        assert!(state.set_theme(Theme::Dark).is_err());
        assert_eq!(state.theme(), Theme::System);
        assert!(state.set_locale("de").is_err());
        assert_eq!(state.locale(), "en");
    }
}
