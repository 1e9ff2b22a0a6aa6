//! Light / dark preference, stored as the bare string under `theme`.

use catalog_core::Theme;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::storage::{keys, SharedStorage};

pub struct ThemeStore {
    theme: Mutex<Theme>,
    storage: SharedStorage,
}

impl ThemeStore {
    /// Restores the stored theme; anything unrecognised means light.
    pub async fn load(storage: SharedStorage) -> StoreResult<Self> {
        let theme = match storage.get(keys::THEME).await? {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                warn!(error = %e, "Falling back to light theme");
                Theme::Light
            }),
            None => Theme::default(),
        };

        Ok(ThemeStore {
            theme: Mutex::new(theme),
            storage,
        })
    }

    pub async fn current(&self) -> Theme {
        *self.theme.lock().await
    }

    pub async fn set(&self, theme: Theme) -> StoreResult<()> {
        let mut current = self.theme.lock().await;
        *current = theme;
        debug!(theme = %theme, "Theme set");
        self.storage.set(keys::THEME, theme.as_str()).await
    }

    /// Switches light <-> dark and returns the new theme.
    pub async fn toggle(&self) -> StoreResult<Theme> {
        let mut current = self.theme.lock().await;
        *current = current.toggled();
        let theme = *current;
        debug!(theme = %theme, "Theme toggled");
        self.storage.set(keys::THEME, theme.as_str()).await?;
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryKeyValueStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_defaults_to_light() {
        let theme = ThemeStore::load(Arc::new(MemoryKeyValueStore::new()))
            .await
            .unwrap();
        assert_eq!(theme.current().await, Theme::Light);
    }

    #[tokio::test]
    async fn test_toggle_persists_raw_value() {
        let memory = Arc::new(MemoryKeyValueStore::new());
        let theme = ThemeStore::load(memory.clone()).await.unwrap();

        assert_eq!(theme.toggle().await.unwrap(), Theme::Dark);
        assert_eq!(memory.get(keys::THEME).await.unwrap().as_deref(), Some("dark"));

        let reloaded = ThemeStore::load(memory.clone()).await.unwrap();
        assert_eq!(reloaded.current().await, Theme::Dark);

        reloaded.set(Theme::Light).await.unwrap();
        assert_eq!(memory.get(keys::THEME).await.unwrap().as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_unknown_value_falls_back() {
        let memory = Arc::new(MemoryKeyValueStore::with_entries([(keys::THEME, "sepia")]));
        let theme = ThemeStore::load(memory).await.unwrap();
        assert_eq!(theme.current().await, Theme::Light);
    }
}
