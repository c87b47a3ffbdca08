use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;

use crate::api::WeatherSource;
use crate::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::favorites::Favorites;
use crate::model::{LocationCandidate, WeatherSnapshot};
use crate::storage::{KEY_CITY, KvStore};
use crate::units::TemperatureUnit;

/// City fetched on first run, before anything was ever viewed.
pub const DEFAULT_CITY: &str = "Paris";

/// User-facing alert when a forecast fetch fails, whatever the cause.
pub const FETCH_WEATHER_ALERT: &str = "Failed to fetch weather data";
/// User-facing alert when a location search fails.
pub const FETCH_LOCATIONS_ALERT: &str = "Failed to fetch locations";

const FORECAST_DAYS: u8 = 7;

/// Per-screen state the view layer reads. Every fetch replaces `snapshot`
/// wholesale; a failed fetch leaves it untouched and raises `alert`.
#[derive(Debug, Default)]
pub struct HomeState {
    pub snapshot: Option<WeatherSnapshot>,
    pub candidates: Vec<LocationCandidate>,
    pub unit: TemperatureUnit,
    pub alert: Option<String>,
}

/// Orchestrates the home screen: mount fetch, debounced location search,
/// city selection, favorite and unit toggles.
pub struct HomeController {
    source: Arc<dyn WeatherSource>,
    store: Arc<KvStore>,
    state: Arc<Mutex<HomeState>>,
    favorites: Favorites,
    debouncer: Debouncer,
    initial_city: Option<String>,
}

impl HomeController {
    /// `initial_city` is set when the user navigated here from the
    /// favorites screen; otherwise the persisted last-viewed city applies.
    pub fn new(
        source: Arc<dyn WeatherSource>,
        store: Arc<KvStore>,
        initial_city: Option<String>,
    ) -> Self {
        Self {
            source,
            store: Arc::clone(&store),
            state: Arc::new(Mutex::new(HomeState::default())),
            favorites: Favorites::new(store),
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
            initial_city,
        }
    }

    /// Mount: fetch the initial city and load the favorites mirror.
    ///
    /// An explicit initial city counts as a view and is persisted; falling
    /// back to the stored (or default) city does not overwrite the store.
    pub async fn init(&mut self) {
        match self.initial_city.take() {
            Some(city) => self.view_city(&city, true).await,
            None => {
                let city = match self.store.get::<String>(KEY_CITY).await {
                    Ok(Some(city)) => city,
                    Ok(None) => DEFAULT_CITY.to_string(),
                    Err(err) => {
                        warn!(error = %err, "could not read last viewed city, using default");
                        DEFAULT_CITY.to_string()
                    }
                };
                self.view_city(&city, false).await;
            }
        }

        if let Err(err) = self.favorites.load().await {
            warn!(error = %err, "could not load favorites");
        }
    }

    /// Search-box input. The search itself fires only after the input has
    /// been quiet for the debounce window, carrying the latest text.
    /// Queries of up to two characters never trigger a request.
    pub fn on_search_input(&mut self, text: &str) {
        let query = text.trim().to_string();
        let source = Arc::clone(&self.source);
        let state = Arc::downgrade(&self.state);

        self.debouncer.call(async move {
            if query.chars().count() <= 2 {
                return;
            }
            let Some(state) = state.upgrade() else { return };

            match source.search(&query).await {
                Ok(candidates) => {
                    state.lock().await.candidates = candidates;
                }
                Err(err) => {
                    warn!(query = %query, error = %err, "location search failed");
                    let mut state = state.lock().await;
                    state.candidates.clear();
                    state.alert = Some(FETCH_LOCATIONS_ALERT.to_string());
                }
            }
        });
    }

    /// Wait out a pending debounced search so the caller can read the
    /// candidates it produced.
    pub async fn flush_search(&mut self) {
        self.debouncer.flush().await;
    }

    /// User picked a search candidate: clear search state, fetch its
    /// forecast, and persist it as the last viewed city on success.
    pub async fn select_location(&mut self, city: &str) {
        self.debouncer.cancel();
        self.state.lock().await.candidates.clear();
        self.view_city(city, true).await;
    }

    /// Add or remove the currently shown city from favorites. No-op while
    /// no snapshot is shown.
    pub async fn toggle_favorite(&mut self) -> Result<()> {
        let Some(city) = self.current_city().await else {
            return Ok(());
        };

        if self.favorites.contains(&city) {
            self.favorites.remove(&city).await
        } else {
            self.favorites.add(&city).await
        }
    }

    pub async fn toggle_unit(&self) {
        let mut state = self.state.lock().await;
        state.unit = state.unit.toggled();
    }

    pub async fn state(&self) -> MutexGuard<'_, HomeState> {
        self.state.lock().await
    }

    /// Remove and return the pending alert, if any.
    pub async fn take_alert(&self) -> Option<String> {
        self.state.lock().await.alert.take()
    }

    pub async fn current_city(&self) -> Option<String> {
        self.state.lock().await.snapshot.as_ref().map(|s| s.location.name.clone())
    }

    pub async fn is_current_favorite(&self) -> bool {
        match self.current_city().await {
            Some(city) => self.favorites.contains(&city),
            None => false,
        }
    }

    async fn view_city(&self, city: &str, persist: bool) {
        match self.source.forecast(city, FORECAST_DAYS).await {
            Ok(snapshot) => {
                if persist {
                    if let Err(err) = self.store.put(KEY_CITY, &city).await {
                        warn!(city = %city, error = %err, "could not persist last viewed city");
                    }
                }

                let mut state = self.state.lock().await;
                state.snapshot = Some(snapshot);
                state.alert = None;
            }
            Err(err) => {
                warn!(city = %city, error = %err, "forecast fetch failed");
                self.state.lock().await.alert = Some(FETCH_WEATHER_ALERT.to_string());
            }
        }
    }
}
