mod open_weather;

pub use open_weather::*;

use async_trait::async_trait;
use std::fmt;

use crate::{Coordinates, ForecastPoint, LocationIdentity, UvReading, WeatherSnapshot};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("no location matched the query")]
    NotFound,
    #[error("provider rejected the API key")]
    Auth,
    #[error("provider rate limit exceeded")]
    RateLimited,
    #[error("provider returned status {status}")]
    Upstream { status: u16 },
    #[error("request timed out")]
    Timeout,
    #[error("error sending request: {0}")]
    Transport(String),
    #[error("error decoding response: {0}")]
    Decode(String),
}

/// Coarse classification used when presenting a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AuthError,
    RateLimited,
    ProviderError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AuthError => "auth_error",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::ProviderError => "provider_error",
        };
        f.write_str(name)
    }
}

impl ProviderError {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ProviderError::Auth,
            429 => ProviderError::RateLimited,
            status => ProviderError::Upstream { status },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::NotFound => ErrorKind::NotFound,
            ProviderError::Auth => ErrorKind::AuthError,
            ProviderError::RateLimited => ErrorKind::RateLimited,
            ProviderError::Upstream { .. }
            | ProviderError::Timeout
            | ProviderError::Transport(_)
            | ProviderError::Decode(_) => ErrorKind::ProviderError,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::from_status(status.as_u16())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// Result of a best-effort provider call. `Unavailable` is a normal outcome,
/// not an error, and callers are expected to degrade.
#[derive(Debug, Clone, PartialEq)]
pub enum Capability<T> {
    Available(T),
    Unavailable { reason: String },
}

impl<T> Capability<T> {
    pub fn unavailable(reason: impl fmt::Display) -> Self {
        Capability::Unavailable {
            reason: reason.to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available(_))
    }
}

impl<T> From<Result<T, ProviderError>> for Capability<T> {
    fn from(result: Result<T, ProviderError>) -> Self {
        match result {
            Ok(value) => Capability::Available(value),
            Err(err) => Capability::unavailable(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    pub identity: LocationIdentity,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Place name the provider attaches to the coordinates.
    pub location: LocationIdentity,
    pub snapshot: WeatherSnapshot,
}

/// The network boundary. Each method is a single round trip and never retries.
#[async_trait]
pub trait WeatherProvider: Sync + Send {
    /// Resolves a free-text place name, taking the first match.
    async fn geocode(&self, query: &str) -> Result<GeocodedLocation, ProviderError>;
    async fn current_conditions(
        &self,
        coordinates: Coordinates,
    ) -> Result<CurrentConditions, ProviderError>;
    async fn forecast(&self, coordinates: Coordinates) -> Capability<Vec<ForecastPoint>>;
    async fn uv_index(&self, coordinates: Coordinates) -> Capability<UvReading>;
}
