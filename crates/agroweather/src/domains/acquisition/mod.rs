mod forecast;

pub use forecast::*;

use rand::{rngs::StdRng, Rng};
use slog::{debug, info, warn, Logger};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    Capability, Coordinates, ErrorKind, ProviderError, UvReading, WeatherProvider, WeatherReport,
};

#[derive(Debug, Clone, PartialEq)]
pub enum QueryInput {
    City(String),
    /// Coordinates from device location; geocoding is skipped.
    Coordinates(Coordinates),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Geocoding,
    FetchingCurrent,
    FetchingForecast,
    FetchingUv,
    Assembling,
    Done,
    LocationNotFound,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Geocoding => "geocoding",
            PipelineState::FetchingCurrent => "fetching current conditions",
            PipelineState::FetchingForecast => "fetching forecast",
            PipelineState::FetchingUv => "fetching uv index",
            PipelineState::Assembling => "assembling",
            PipelineState::Done => "done",
            PipelineState::LocationNotFound => "location not found",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AcquisitionError {
    #[error("location not found: {0}")]
    LocationNotFound(String),
    #[error("{stage} failed: {source}")]
    Failed {
        stage: PipelineState,
        source: ProviderError,
    },
    #[error("query superseded by a newer query")]
    Superseded,
}

impl AcquisitionError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AcquisitionError::LocationNotFound(_) => Some(ErrorKind::NotFound),
            AcquisitionError::Failed { source, .. } => Some(source.kind()),
            AcquisitionError::Superseded => None,
        }
    }

    /// Text for the person running the query, worded by error category.
    pub fn user_message(&self) -> String {
        match self {
            AcquisitionError::LocationNotFound(_) => {
                String::from("Location not found. Please try a different city name.")
            }
            AcquisitionError::Failed { source, .. } => match source.kind() {
                ErrorKind::AuthError => String::from(
                    "Invalid API key. Please verify your OpenWeatherMap API key is correct and activated.",
                ),
                ErrorKind::RateLimited => {
                    String::from("Too many requests. Please wait a moment and try again.")
                }
                ErrorKind::NotFound | ErrorKind::ProviderError => {
                    format!("Failed to fetch weather data: {}. Please try again.", source)
                }
            },
            AcquisitionError::Superseded => String::from("A newer query replaced this one."),
        }
    }
}

/// Runs one query at a time through geocoding, current conditions, forecast
/// and UV. Only geocoding and current conditions can fail a query; forecast
/// and UV degrade to synthesized values.
///
/// Starting a query supersedes any query still in flight: the older one stops
/// at its next step and returns `AcquisitionError::Superseded`.
pub struct AcquisitionPipeline {
    logger: Logger,
    provider: Arc<dyn WeatherProvider>,
    rng: Mutex<StdRng>,
    state: Mutex<PipelineState>,
    generation: AtomicU64,
}

impl AcquisitionPipeline {
    pub fn new(logger: Logger, provider: Arc<dyn WeatherProvider>, rng: StdRng) -> Self {
        AcquisitionPipeline {
            logger,
            provider,
            rng: Mutex::new(rng),
            state: Mutex::new(PipelineState::Idle),
            generation: AtomicU64::new(0),
        }
    }

    /// State of the most recent query.
    pub async fn state(&self) -> PipelineState {
        *self.state.lock().await
    }

    fn is_current(&self, query: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == query
    }

    async fn transition(&self, query: u64, next: PipelineState) -> Result<(), AcquisitionError> {
        // Generation is checked under the state lock so a superseded query
        // cannot overwrite a newer one's state.
        let mut state = self.state.lock().await;
        if !self.is_current(query) {
            debug!(self.logger, "query {} superseded before {}", query, next);
            return Err(AcquisitionError::Superseded);
        }
        debug!(self.logger, "query {}: {} -> {}", query, *state, next);
        *state = next;
        Ok(())
    }

    pub async fn acquire_report(
        &self,
        input: QueryInput,
    ) -> Result<WeatherReport, AcquisitionError> {
        let query = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.run(query, input).await;

        let terminal = match &result {
            Ok(_) | Err(AcquisitionError::Superseded) => None,
            Err(AcquisitionError::LocationNotFound(_)) => Some(PipelineState::LocationNotFound),
            Err(AcquisitionError::Failed { .. }) => Some(PipelineState::Failed),
        };
        if let (Some(terminal), Err(e)) = (terminal, &result) {
            warn!(self.logger, "query {} ended: {}", query, e);
            let mut state = self.state.lock().await;
            if self.is_current(query) {
                *state = terminal;
            }
        }
        result
    }

    async fn run(&self, query: u64, input: QueryInput) -> Result<WeatherReport, AcquisitionError> {
        let (geocoded, coordinates) = match input {
            QueryInput::City(name) => {
                self.transition(query, PipelineState::Geocoding).await?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(AcquisitionError::LocationNotFound(String::new()));
                }
                match self.provider.geocode(name).await {
                    Ok(location) => (Some(location.identity), location.coordinates),
                    Err(ProviderError::NotFound) => {
                        return Err(AcquisitionError::LocationNotFound(name.to_string()))
                    }
                    Err(source) => {
                        return Err(AcquisitionError::Failed {
                            stage: PipelineState::Geocoding,
                            source,
                        })
                    }
                }
            }
            QueryInput::Coordinates(coordinates) => (None, coordinates),
        };

        self.transition(query, PipelineState::FetchingCurrent).await?;
        let current = self
            .provider
            .current_conditions(coordinates)
            .await
            .map_err(|source| AcquisitionError::Failed {
                stage: PipelineState::FetchingCurrent,
                source,
            })?;

        self.transition(query, PipelineState::FetchingForecast).await?;
        let raw_forecast = self.provider.forecast(coordinates).await;
        if let Capability::Unavailable { reason } = &raw_forecast {
            info!(self.logger, "forecast unavailable, extrapolating: {}", reason);
        }
        let (forecast, forecast_synthesized) = {
            let mut rng = self.rng.lock().await;
            assemble_forecast(&current.snapshot, raw_forecast, &mut *rng)
        };

        self.transition(query, PipelineState::FetchingUv).await?;
        let uv = match self.provider.uv_index(coordinates).await {
            Capability::Available(uv) => uv,
            Capability::Unavailable { reason } => {
                info!(self.logger, "uv index unavailable, synthesizing: {}", reason);
                synthesize_uv(&mut *self.rng.lock().await)
            }
        };

        self.transition(query, PipelineState::Assembling).await?;
        let report = WeatherReport {
            location: geocoded.unwrap_or(current.location),
            coordinates,
            current: current.snapshot,
            uv,
            forecast,
            forecast_synthesized,
        };

        self.transition(query, PipelineState::Done).await?;
        info!(self.logger, "query {} done for {}", query, report.location);
        Ok(report)
    }
}

/// Uniform integer UV index in [0, 10].
pub fn synthesize_uv<R: Rng + ?Sized>(rng: &mut R) -> UvReading {
    UvReading {
        index: f64::from(rng.gen_range(0u8..=10)),
        synthesized: true,
    }
}
