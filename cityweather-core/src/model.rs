use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One forecast query result, shaped after the weatherapi.com payload.
///
/// A snapshot is replaced wholesale on every fetch; it is never patched in
/// place, so a value of this type is always fully populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: Current,
    pub forecast: Forecast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Current {
    pub temp_c: f64,
    pub condition: Condition,
    pub wind_kph: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub astro: Astro,
    pub day: Day,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Astro {
    /// Local sunrise time as reported by the API, e.g. "06:42 AM".
    pub sunrise: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    pub avgtemp_c: f64,
    pub condition: Condition,
}

/// A city offered by the location search. Ephemeral: discarded once the
/// user picks one or clears the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    pub country: String,
}
