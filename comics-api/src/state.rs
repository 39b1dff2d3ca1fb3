//! Application state management

use std::sync::Arc;

use crate::assets::AssetStore;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::repository::{ComicRepository, InMemoryComicStore};

/// Application state shared across handlers
///
/// Generic over the comic store so tests can substitute their own.
pub struct AppState<R = InMemoryComicStore> {
    config: Arc<Config>,
    comics: Arc<R>,
    assets: AssetStore,
}

// Manual impl: `R` itself need not be `Clone`
impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            comics: Arc::clone(&self.comics),
            assets: self.assets.clone(),
        }
    }
}

impl AppState<InMemoryComicStore> {
    /// State backed by an empty in-memory store
    pub fn in_memory(config: Config) -> Self {
        let assets = AssetStore::from_config(&config.comics);
        Self {
            config: Arc::new(config),
            comics: Arc::new(InMemoryComicStore::new()),
            assets,
        }
    }
}

impl<R: ComicRepository> AppState<R> {
    pub fn builder() -> AppStateBuilder<R> {
        AppStateBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn comics(&self) -> &R {
        &self.comics
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }
}

/// Builder for [`AppState`]
///
/// ```rust
/// use comics_api::{config::Config, repository::InMemoryComicStore, state::AppState};
///
/// let state = AppState::builder()
///     .config(Config::default())
///     .comics(InMemoryComicStore::new())
///     .build()
///     .unwrap();
/// assert_eq!(state.config().comics.mount_path, "/comics");
/// ```
pub struct AppStateBuilder<R> {
    config: Option<Config>,
    comics: Option<R>,
    assets: Option<AssetStore>,
}

impl<R: ComicRepository> AppStateBuilder<R> {
    pub fn new() -> Self {
        Self {
            config: None,
            comics: None,
            assets: None,
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    pub fn comics(mut self, comics: R) -> Self {
        self.comics = Some(comics);
        self
    }

    /// Override the asset store derived from `comics.assets_dir`
    pub fn assets(mut self, assets: AssetStore) -> Self {
        self.assets = Some(assets);
        self
    }

    pub fn build(self) -> Result<AppState<R>> {
        let config = self.config.unwrap_or_default();
        let comics = self
            .comics
            .ok_or_else(|| Error::Internal("AppState requires a comic store".to_string()))?;
        let assets = self
            .assets
            .unwrap_or_else(|| AssetStore::from_config(&config.comics));

        Ok(AppState {
            config: Arc::new(config),
            comics: Arc::new(comics),
            assets,
        })
    }
}

impl<R: ComicRepository> Default for AppStateBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}
