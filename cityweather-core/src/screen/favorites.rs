use std::sync::Arc;
use tracing::warn;

use crate::api::WeatherSource;
use crate::favorites::{FavoriteWeather, Favorites};
use crate::storage::KvStore;

/// Backs the favorites screen: loads the persisted list on entry, then
/// refreshes every city's snapshot. Selecting a row is the caller's
/// concern; this controller only hands out the rows.
pub struct FavoritesController {
    source: Arc<dyn WeatherSource>,
    favorites: Favorites,
    rows: Vec<FavoriteWeather>,
}

impl FavoritesController {
    pub fn new(source: Arc<dyn WeatherSource>, store: Arc<KvStore>) -> Self {
        Self { source, favorites: Favorites::new(store), rows: Vec::new() }
    }

    /// Mount: re-read the persisted list, then refresh all snapshots.
    pub async fn init(&mut self) {
        if let Err(err) = self.favorites.load().await {
            warn!(error = %err, "could not load favorites");
        }

        self.rows = self.favorites.refresh_all(self.source.as_ref()).await;
    }

    /// Manual reload runs the same two steps as mounting.
    pub async fn reload(&mut self) {
        self.init().await;
    }

    /// City/snapshot rows in favorites-list order. Cities whose refresh
    /// failed are absent.
    pub fn rows(&self) -> &[FavoriteWeather] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
