/// Per-screen temperature display preference. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Convert a Celsius reading into this unit.
    pub fn convert(&self, temp_c: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => temp_c,
            TemperatureUnit::Fahrenheit => temp_c * 9.0 / 5.0 + 32.0,
        }
    }

    /// Display form with one decimal place, e.g. "64.4°F".
    pub fn format(&self, temp_c: f64) -> String {
        format!("{:.1}{}", self.convert(temp_c), self.suffix())
    }
}
