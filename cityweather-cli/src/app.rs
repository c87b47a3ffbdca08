//! The interactive session: a thin view layer over the screen controllers.
//!
//! Controllers are created when a screen is entered and dropped when it is
//! left, so pending debounced work dies with its screen.

use anyhow::Result;
use inquire::{Select, Text};
use std::sync::Arc;

use cityweather_core::screen::{FavoritesController, HomeController};
use cityweather_core::{KvStore, TemperatureUnit, WeatherApiClient, WeatherSource};

use crate::render;

const SEARCH: &str = "Search city";
const TO_FAHRENHEIT: &str = "Switch to °F";
const TO_CELSIUS: &str = "Switch to °C";
const ADD_FAVORITE: &str = "Add favorite";
const REMOVE_FAVORITE: &str = "Remove favorite";
const FAVORITES: &str = "Favorites";
const QUIT: &str = "Quit";

const RELOAD: &str = "Reload";
const BACK: &str = "Back";

enum HomeOutcome {
    OpenFavorites,
    Quit,
}

pub async fn run(client: Arc<WeatherApiClient>, store: Arc<KvStore>) -> Result<()> {
    let source: Arc<dyn WeatherSource> = client;
    let mut next_city: Option<String> = None;

    loop {
        let mut home =
            HomeController::new(Arc::clone(&source), Arc::clone(&store), next_city.take());
        home.init().await;

        match home_screen(&mut home).await? {
            HomeOutcome::OpenFavorites => {
                if let Some(city) = favorites_screen(&source, &store).await? {
                    next_city = Some(city);
                }
            }
            HomeOutcome::Quit => return Ok(()),
        }
    }
}

async fn home_screen(home: &mut HomeController) -> Result<HomeOutcome> {
    loop {
        if let Some(alert) = home.take_alert().await {
            println!("Error: {alert}");
        }

        let unit = {
            let state = home.state().await;
            match &state.snapshot {
                Some(snapshot) => println!("{}", render::snapshot(snapshot, state.unit)),
                None => println!("No weather data to show."),
            }
            state.unit
        };

        let unit_label = match unit {
            TemperatureUnit::Celsius => TO_FAHRENHEIT,
            TemperatureUnit::Fahrenheit => TO_CELSIUS,
        };
        let favorite_label =
            if home.is_current_favorite().await { REMOVE_FAVORITE } else { ADD_FAVORITE };

        let options = vec![SEARCH, unit_label, favorite_label, FAVORITES, QUIT];

        match Select::new("cityweather", options).prompt()? {
            SEARCH => search_flow(home).await?,
            TO_FAHRENHEIT | TO_CELSIUS => home.toggle_unit().await,
            ADD_FAVORITE | REMOVE_FAVORITE => home.toggle_favorite().await?,
            FAVORITES => return Ok(HomeOutcome::OpenFavorites),
            _ => return Ok(HomeOutcome::Quit),
        }
    }
}

async fn search_flow(home: &mut HomeController) -> Result<()> {
    let query = Text::new("Search city:").prompt()?;

    home.on_search_input(&query);
    home.flush_search().await;

    let labels: Vec<String> = {
        let state = home.state().await;
        state.candidates.iter().map(|c| format!("{}, {}", c.name, c.country)).collect()
    };

    if labels.is_empty() {
        // Too short a query, no matches, or a failed request; an alert, if
        // one was raised, prints on the next render.
        println!("No locations found.");
        return Ok(());
    }

    let picked = Select::new("Locations", labels.clone()).prompt()?;

    // Map the display string back to the candidate it was built from.
    let index = labels.iter().position(|label| *label == picked).unwrap_or(0);
    let city = { home.state().await.candidates[index].name.clone() };

    home.select_location(&city).await;
    Ok(())
}

async fn favorites_screen(
    source: &Arc<dyn WeatherSource>,
    store: &Arc<KvStore>,
) -> Result<Option<String>> {
    let mut screen = FavoritesController::new(Arc::clone(source), Arc::clone(store));
    screen.init().await;

    loop {
        println!("Favorite cities:");
        if screen.is_empty() {
            println!("  none yet. Add one from the home screen.");
        }

        let mut options: Vec<String> =
            screen.rows().iter().map(render::favorite_row).collect();
        options.push(RELOAD.to_string());
        options.push(BACK.to_string());

        let picked = Select::new("Favorites", options).prompt()?;
        match picked.as_str() {
            RELOAD => screen.reload().await,
            BACK => return Ok(None),
            label => {
                let index = screen
                    .rows()
                    .iter()
                    .position(|row| render::favorite_row(row) == label);
                if let Some(index) = index {
                    return Ok(Some(screen.rows()[index].city.clone()));
                }
            }
        }
    }
}
