use async_trait::async_trait;
use serde::Deserialize;
use slog::{debug, info, warn, Logger};
use std::sync::Arc;
use time::OffsetDateTime;

use crate::{
    Capability, ConditionCategory, Coordinates, CurrentConditions, ForecastPoint,
    GeocodedLocation, JsonFetcher, LocationIdentity, ProviderError, UvReading, WeatherProvider,
    WeatherSnapshot,
};

/// OpenWeatherMap reports visibility capped at 10km and omits it in some responses.
const DEFAULT_VISIBILITY_M: i32 = 10_000;

#[derive(Debug, Clone, Deserialize)]
pub struct OwmGeocodeEntry {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
}

impl From<OwmGeocodeEntry> for GeocodedLocation {
    fn from(val: OwmGeocodeEntry) -> Self {
        GeocodedLocation {
            identity: LocationIdentity {
                display_name: val.name,
                country_code: val.country,
            },
            coordinates: Coordinates::new(val.lat, val.lon),
        }
    }
}

/// Picks the first match; an empty list means the place is unknown.
pub fn first_match(entries: Vec<OwmGeocodeEntry>) -> Result<GeocodedLocation, ProviderError> {
    entries
        .into_iter()
        .next()
        .map(GeocodedLocation::from)
        .ok_or(ProviderError::NotFound)
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmCondition {
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwmSys {
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwmWind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmCurrent {
    pub dt: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sys: OwmSys,
    pub main: OwmMain,
    #[serde(default)]
    pub visibility: Option<i32>,
    #[serde(default)]
    pub wind: OwmWind,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
}

fn parse_timestamp(dt: i64) -> Result<OffsetDateTime, ProviderError> {
    OffsetDateTime::from_unix_timestamp(dt)
        .map_err(|e| ProviderError::Decode(format!("invalid timestamp {}: {}", dt, e)))
}

fn primary_condition(weather: &[OwmCondition]) -> Option<(ConditionCategory, String)> {
    weather.first().map(|condition| {
        (
            ConditionCategory::from(condition.main.as_str()),
            condition.description.clone(),
        )
    })
}

impl TryFrom<OwmCurrent> for CurrentConditions {
    type Error = ProviderError;
    fn try_from(val: OwmCurrent) -> Result<Self, Self::Error> {
        let (condition, condition_description) = primary_condition(&val.weather)
            .ok_or_else(|| ProviderError::Decode(String::from("missing weather condition")))?;

        let snapshot = WeatherSnapshot {
            timestamp_utc: parse_timestamp(val.dt)?,
            temperature_c: val.main.temp,
            feels_like_c: val.main.feels_like,
            humidity_pct: val.main.humidity.round().clamp(0.0, 100.0) as u8,
            pressure_hpa: val.main.pressure.round() as i32,
            visibility_m: val.visibility.unwrap_or(DEFAULT_VISIBILITY_M),
            wind_speed_ms: val.wind.speed,
            condition,
            condition_description,
        };

        Ok(CurrentConditions {
            location: LocationIdentity {
                display_name: val.name,
                country_code: val.sys.country.unwrap_or_default(),
            },
            snapshot,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmForecastMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmForecastItem {
    pub dt: i64,
    pub main: OwmForecastMain,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmForecast {
    #[serde(default)]
    pub list: Vec<OwmForecastItem>,
}

impl TryFrom<OwmForecastItem> for ForecastPoint {
    type Error = ProviderError;
    fn try_from(val: OwmForecastItem) -> Result<Self, Self::Error> {
        // A point without a condition keeps its slot so the 3h spacing holds.
        let (condition, condition_description) = primary_condition(&val.weather)
            .unwrap_or_else(|| (ConditionCategory::Other(String::new()), String::new()));
        Ok(ForecastPoint {
            timestamp_utc: parse_timestamp(val.dt)?,
            temperature_c: val.main.temp,
            condition,
            condition_description,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmUv {
    pub value: f64,
}

pub struct OpenWeatherClient {
    logger: Logger,
    fetcher: Arc<JsonFetcher>,
    api_base: String,
    geo_base: String,
}

impl OpenWeatherClient {
    pub fn new(
        logger: Logger,
        fetcher: Arc<JsonFetcher>,
        api_base: String,
        geo_base: String,
    ) -> Self {
        Self {
            logger,
            fetcher,
            api_base: api_base.trim_end_matches('/').to_string(),
            geo_base: geo_base.trim_end_matches('/').to_string(),
        }
    }

    fn coordinate_params(coordinates: Coordinates) -> Vec<(&'static str, String)> {
        vec![
            ("lat", coordinates.latitude.to_string()),
            ("lon", coordinates.longitude.to_string()),
        ]
    }

    fn metric_params(coordinates: Coordinates) -> Vec<(&'static str, String)> {
        let mut params = Self::coordinate_params(coordinates);
        params.push(("units", String::from("metric")));
        params
    }

    async fn fetch_forecast(
        &self,
        coordinates: Coordinates,
    ) -> Result<Vec<ForecastPoint>, ProviderError> {
        let url = format!("{}/forecast", self.api_base);
        let raw: OwmForecast = self
            .fetcher
            .fetch_json(&url, &Self::metric_params(coordinates))
            .await?;
        raw.list.into_iter().map(ForecastPoint::try_from).collect()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn geocode(&self, query: &str) -> Result<GeocodedLocation, ProviderError> {
        let url = format!("{}/direct", self.geo_base);
        info!(self.logger, "geocoding location: {}", query);
        let params = [("q", query.to_string()), ("limit", String::from("1"))];
        let entries: Vec<OwmGeocodeEntry> = match self.fetcher.fetch_json(&url, &params).await {
            Ok(entries) => entries,
            Err(ProviderError::Upstream { status: 404 }) => return Err(ProviderError::NotFound),
            Err(e) => return Err(e),
        };
        debug!(self.logger, "geocode matches: {}", entries.len());
        first_match(entries)
    }

    async fn current_conditions(
        &self,
        coordinates: Coordinates,
    ) -> Result<CurrentConditions, ProviderError> {
        let url = format!("{}/weather", self.api_base);
        info!(self.logger, "fetching current conditions for {}", coordinates);
        let raw: OwmCurrent = self
            .fetcher
            .fetch_json(&url, &Self::metric_params(coordinates))
            .await?;
        CurrentConditions::try_from(raw)
    }

    async fn forecast(&self, coordinates: Coordinates) -> Capability<Vec<ForecastPoint>> {
        info!(self.logger, "fetching forecast for {}", coordinates);
        let result = self.fetch_forecast(coordinates).await;
        if let Err(e) = &result {
            warn!(self.logger, "forecast data not available: {}", e);
        }
        result.into()
    }

    async fn uv_index(&self, coordinates: Coordinates) -> Capability<UvReading> {
        let url = format!("{}/uvi", self.api_base);
        let result = self
            .fetcher
            .fetch_json::<OwmUv>(&url, &Self::coordinate_params(coordinates))
            .await
            .map(|uv| UvReading::measured(uv.value));
        if let Err(e) = &result {
            warn!(self.logger, "UV data not available: {}", e);
        }
        result.into()
    }
}
