//! Text rendering of weather data for the terminal.

use cityweather_core::TemperatureUnit;
use cityweather_core::favorites::FavoriteWeather;
use cityweather_core::model::WeatherSnapshot;

/// Glyph for a weatherapi.com condition text. Unknown texts fall back to a
/// neutral dot rather than failing the render.
pub fn condition_glyph(text: &str) -> &'static str {
    let lower = text.to_lowercase();

    match lower.as_str() {
        "sunny" | "clear" => "☀",
        "partly cloudy" => "⛅",
        "cloudy" | "overcast" => "☁",
        "mist" | "fog" | "freezing fog" => "🌫",
        t if t.contains("thunder") => "⛈",
        t if t.contains("snow") || t.contains("sleet") || t.contains("blizzard") || t.contains("ice") => "❄",
        t if t.contains("rain") || t.contains("drizzle") || t.contains("shower") => "🌧",
        _ => "·",
    }
}

/// Multi-line rendering of the home forecast view: location header, current
/// conditions, stats line, and the daily strip (at most seven days).
pub fn snapshot(snapshot: &WeatherSnapshot, unit: TemperatureUnit) -> String {
    let location = &snapshot.location;
    let current = &snapshot.current;

    let mut out = String::new();
    out.push_str(&format!("{}, {}\n", location.name, location.country));
    out.push_str(&format!(
        "{} {}  {}\n",
        condition_glyph(&current.condition.text),
        current.condition.text,
        unit.format(current.temp_c),
    ));

    out.push_str(&format!("wind {} km/h  humidity {}%", current.wind_kph, current.humidity));
    if let Some(today) = snapshot.forecast.forecastday.first() {
        out.push_str(&format!("  sunrise {}", today.astro.sunrise));
    }
    out.push('\n');

    for day in snapshot.forecast.forecastday.iter().take(7) {
        let day_name = day.date.format("%A").to_string();
        out.push_str(&format!(
            "  {:<9} {} {}\n",
            day_name,
            condition_glyph(&day.day.condition.text),
            unit.format(day.day.avgtemp_c),
        ));
    }

    out
}

/// One favorites-screen row: name, country, condition, current temperature.
/// The list view always shows Celsius.
pub fn favorite_row(row: &FavoriteWeather) -> String {
    let location = &row.snapshot.location;
    let current = &row.snapshot.current;

    format!(
        "{}, {}  {} {}  {:.1}°C",
        location.name,
        location.country,
        condition_glyph(&current.condition.text),
        current.condition.text,
        current.temp_c,
    )
}
