//! Favorite cities, reconciled with the on-device store.
//!
//! The canonical list lives under the `"favorites"` key; each screen keeps
//! its own in-memory mirror and writes the full list back on every
//! mutation. There is no automatic sync between mirrors: a screen sees
//! another screen's changes only after an explicit `load`.

use anyhow::Result;
use futures::future;
use std::sync::Arc;
use tracing::warn;

use crate::api::WeatherSource;
use crate::model::WeatherSnapshot;
use crate::storage::{KEY_FAVORITES, KvStore};

/// A favorite city with its freshly fetched 1-day snapshot.
#[derive(Debug, Clone)]
pub struct FavoriteWeather {
    pub city: String,
    pub snapshot: WeatherSnapshot,
}

/// In-memory mirror of the persisted favorites list. Ordered, no duplicates.
#[derive(Debug)]
pub struct Favorites {
    store: Arc<KvStore>,
    cities: Vec<String>,
}

impl Favorites {
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store, cities: Vec::new() }
    }

    /// Replace the mirror with the persisted list. An absent key is an
    /// empty list.
    pub async fn load(&mut self) -> Result<()> {
        self.cities = self.store.get(KEY_FAVORITES).await?.unwrap_or_default();
        Ok(())
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn contains(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    /// Append `city` unless already present, then persist the full list.
    pub async fn add(&mut self, city: &str) -> Result<()> {
        if self.contains(city) {
            return Ok(());
        }

        self.cities.push(city.to_string());
        self.store.put(KEY_FAVORITES, &self.cities).await
    }

    /// Remove every occurrence of `city`, then persist the full list.
    pub async fn remove(&mut self, city: &str) -> Result<()> {
        self.cities.retain(|c| c != city);
        self.store.put(KEY_FAVORITES, &self.cities).await
    }

    /// Fetch a 1-day forecast for every favorite concurrently and join the
    /// results in list order. A city whose fetch fails is logged and
    /// skipped; the others still render.
    pub async fn refresh_all(&self, source: &dyn WeatherSource) -> Vec<FavoriteWeather> {
        let fetches = self
            .cities
            .iter()
            .map(|city| async move { (city.clone(), source.forecast(city, 1).await) });

        future::join_all(fetches)
            .await
            .into_iter()
            .filter_map(|(city, result)| match result {
                Ok(snapshot) => Some(FavoriteWeather { city, snapshot }),
                Err(err) => {
                    warn!(city = %city, error = %err, "skipping favorite after failed refresh");
                    None
                }
            })
            .collect()
    }
}
