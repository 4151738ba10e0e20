use serde::{Serialize, Serializer};
use std::fmt;
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationIdentity {
    pub display_name: String,
    pub country_code: String,
}

impl fmt::Display for LocationIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.country_code.is_empty() {
            write!(f, "{}", self.display_name)
        } else {
            write!(f, "{}, {}", self.display_name, self.country_code)
        }
    }
}

/// Provider weather group. Unknown groups are kept verbatim in `Other` and
/// presented like `Clear`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Smoke,
    Haze,
    Dust,
    Fog,
    Sand,
    Ash,
    Squall,
    Tornado,
    Other(String),
}

impl ConditionCategory {
    pub fn name(&self) -> &str {
        match self {
            ConditionCategory::Clear => "Clear",
            ConditionCategory::Clouds => "Clouds",
            ConditionCategory::Rain => "Rain",
            ConditionCategory::Drizzle => "Drizzle",
            ConditionCategory::Thunderstorm => "Thunderstorm",
            ConditionCategory::Snow => "Snow",
            ConditionCategory::Mist => "Mist",
            ConditionCategory::Smoke => "Smoke",
            ConditionCategory::Haze => "Haze",
            ConditionCategory::Dust => "Dust",
            ConditionCategory::Fog => "Fog",
            ConditionCategory::Sand => "Sand",
            ConditionCategory::Ash => "Ash",
            ConditionCategory::Squall => "Squall",
            ConditionCategory::Tornado => "Tornado",
            ConditionCategory::Other(name) => name,
        }
    }

    pub fn icon_class(&self) -> &'static str {
        match self {
            ConditionCategory::Clouds => "fas fa-cloud",
            ConditionCategory::Rain => "fas fa-cloud-rain",
            ConditionCategory::Drizzle => "fas fa-cloud-drizzle",
            ConditionCategory::Thunderstorm => "fas fa-bolt",
            ConditionCategory::Snow => "fas fa-snowflake",
            ConditionCategory::Mist
            | ConditionCategory::Smoke
            | ConditionCategory::Haze
            | ConditionCategory::Dust
            | ConditionCategory::Fog
            | ConditionCategory::Sand
            | ConditionCategory::Ash => "fas fa-smog",
            ConditionCategory::Squall => "fas fa-wind",
            ConditionCategory::Tornado => "fas fa-tornado",
            ConditionCategory::Clear | ConditionCategory::Other(_) => "fas fa-sun",
        }
    }

    pub fn accent_color(&self) -> &'static str {
        match self {
            ConditionCategory::Clouds => "#95a5a6",
            ConditionCategory::Rain | ConditionCategory::Drizzle => "#3498db",
            ConditionCategory::Thunderstorm => "#9b59b6",
            ConditionCategory::Snow => "#ecf0f1",
            ConditionCategory::Mist | ConditionCategory::Fog => "#bdc3c7",
            ConditionCategory::Smoke | ConditionCategory::Ash => "#7f8c8d",
            ConditionCategory::Dust => "#d35400",
            ConditionCategory::Squall => "#34495e",
            ConditionCategory::Tornado => "#8e44ad",
            ConditionCategory::Clear
            | ConditionCategory::Haze
            | ConditionCategory::Sand
            | ConditionCategory::Other(_) => "#f39c12",
        }
    }
}

impl From<&str> for ConditionCategory {
    fn from(value: &str) -> Self {
        match value {
            "Clear" => ConditionCategory::Clear,
            "Clouds" => ConditionCategory::Clouds,
            "Rain" => ConditionCategory::Rain,
            "Drizzle" => ConditionCategory::Drizzle,
            "Thunderstorm" => ConditionCategory::Thunderstorm,
            "Snow" => ConditionCategory::Snow,
            "Mist" => ConditionCategory::Mist,
            "Smoke" => ConditionCategory::Smoke,
            "Haze" => ConditionCategory::Haze,
            "Dust" => ConditionCategory::Dust,
            "Fog" => ConditionCategory::Fog,
            "Sand" => ConditionCategory::Sand,
            "Ash" => ConditionCategory::Ash,
            "Squall" => ConditionCategory::Squall,
            "Tornado" => ConditionCategory::Tornado,
            other => ConditionCategory::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ConditionCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A single point-in-time reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp_utc: OffsetDateTime,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: i32,
    pub visibility_m: i32,
    pub wind_speed_ms: f64,
    pub condition: ConditionCategory,
    pub condition_description: String,
}

/// Raw forecast point as reported by the provider, before down-sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub timestamp_utc: OffsetDateTime,
    pub temperature_c: f64,
    pub condition: ConditionCategory,
    pub condition_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub day_label: String,
    pub date: Date,
    pub temperature_c: f64,
    pub condition: ConditionCategory,
    pub condition_description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UvReading {
    pub index: f64,
    /// True when the provider had no reading and the value was generated.
    pub synthesized: bool,
}

impl UvReading {
    pub fn measured(index: f64) -> Self {
        Self {
            index,
            synthesized: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: LocationIdentity,
    pub coordinates: Coordinates,
    pub current: WeatherSnapshot,
    pub uv: UvReading,
    pub forecast: Vec<ForecastEntry>,
    /// At least one forecast entry was extrapolated from current conditions.
    pub forecast_synthesized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedMetrics {
    pub soil_temperature_c: i64,
    pub dew_point_c: i64,
    pub precipitation_chance_pct: u8,
    pub heat_index_c: i64,
    pub advisory_tip: String,
}
