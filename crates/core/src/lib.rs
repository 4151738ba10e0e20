//! Agroweather Core Library
//!
//! Shared pieces for the agroweather binaries:
//! - Configuration loading (XDG-compliant)
//! - Provider endpoints and defaults

mod config;

pub use config::{find_config_file, load_config, parse_config, ConfigSource};

/// Application name used for XDG paths
pub const APP_NAME: &str = "agroweather";

/// OpenWeatherMap data API base
pub const DEFAULT_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// OpenWeatherMap geocoding API base
pub const DEFAULT_GEO_API_BASE: &str = "https://api.openweathermap.org/geo/1.0";

/// Per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 8;

/// City queried when neither a city nor coordinates are given
pub const DEFAULT_CITY: &str = "New Delhi";
