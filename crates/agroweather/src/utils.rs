use agroweather_core::{
    find_config_file, load_config, ConfigSource, DEFAULT_API_BASE, DEFAULT_CITY,
    DEFAULT_GEO_API_BASE, DEFAULT_REQUEST_TIMEOUT,
};
use anyhow::Error;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use reqwest::Client;
use serde::de::DeserializeOwned;
use slog::{debug, o, Drain, Level, Logger};
use std::{env, time::Duration};

use crate::{Coordinates, ProviderError, QueryInput};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Agroweather - current conditions, forecast and crop metrics for a location"
)]
pub struct Cli {
    /// City to look up; defaults to the configured default city
    #[serde(skip)]
    pub city: Option<String>,

    /// Path to config file (TOML format)
    /// Searched in order: this flag, $AGROWEATHER_CONFIG, ./agroweather.toml,
    /// $XDG_CONFIG_HOME/agroweather/agroweather.toml, /etc/agroweather/agroweather.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "AGROWEATHER_LEVEL")]
    pub level: Option<String>,

    /// OpenWeatherMap API key
    #[arg(short = 'k', long, env = "AGROWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Weather data API base URL
    #[arg(long, env = "AGROWEATHER_API_BASE")]
    pub api_base: Option<String>,

    /// Geocoding API base URL
    #[arg(long, env = "AGROWEATHER_GEO_BASE")]
    pub geo_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short = 't', long, env = "AGROWEATHER_REQUEST_TIMEOUT")]
    pub request_timeout: Option<u64>,

    /// HTTP User-Agent header for provider requests
    #[arg(short, long, env = "AGROWEATHER_USER_AGENT")]
    pub user_agent: Option<String>,

    /// City used when no city or coordinates are given
    #[arg(long, env = "AGROWEATHER_DEFAULT_CITY")]
    pub default_city: Option<String>,

    /// Latitude, used together with --lon instead of a city
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    #[serde(skip)]
    pub lat: Option<f64>,

    /// Longitude, used together with --lat instead of a city
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    #[serde(skip)]
    pub lon: Option<f64>,

    /// Seed for synthesized values and advisory selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    #[serde(skip)]
    pub json: bool,
}

impl Cli {
    pub fn api_key(&self) -> Option<String> {
        self.api_key.clone().filter(|key| !key.trim().is_empty())
    }

    pub fn api_base(&self) -> String {
        self.api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    pub fn geo_base(&self) -> String {
        self.geo_base
            .clone()
            .unwrap_or_else(|| DEFAULT_GEO_API_BASE.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("agroweather/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn default_city(&self) -> String {
        self.default_city
            .clone()
            .unwrap_or_else(|| DEFAULT_CITY.to_string())
    }

    /// Coordinates win over a city name; with neither, the default city is used.
    pub fn query_input(&self) -> QueryInput {
        match (self.lat, self.lon, &self.city) {
            (Some(lat), Some(lon), _) => QueryInput::Coordinates(Coordinates::new(lat, lon)),
            (_, _, Some(city)) => QueryInput::City(city.clone()),
            _ => QueryInput::City(self.default_city()),
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Result<Cli, Error> {
    let cli_args = Cli::parse();

    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("AGROWEATHER_CONFIG", "agroweather.toml")
    };

    let file_config: Cli = load_config(&source)?;
    Ok(merge_config(cli_args, file_config))
}

/// CLI args override file config (env vars are handled by clap)
pub fn merge_config(cli_args: Cli, file_config: Cli) -> Cli {
    Cli {
        city: cli_args.city,
        config: cli_args.config,
        level: cli_args.level.or(file_config.level),
        api_key: cli_args.api_key.or(file_config.api_key),
        api_base: cli_args.api_base.or(file_config.api_base),
        geo_base: cli_args.geo_base.or(file_config.geo_base),
        request_timeout: cli_args.request_timeout.or(file_config.request_timeout),
        user_agent: cli_args.user_agent.or(file_config.user_agent),
        default_city: cli_args.default_city.or(file_config.default_city),
        lat: cli_args.lat,
        lon: cli_args.lon,
        seed: cli_args.seed.or(file_config.seed),
        json: cli_args.json,
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "info" => Level::Info,
        "warn" => Level::Warning,
        "error" => Level::Error,
        _ => Level::Info,
    }
}

pub fn setup_logger(cli: &Cli) -> Logger {
    let log_level = match cli.level.as_ref() {
        Some(level) => parse_level(level),
        None => parse_level(&env::var("RUST_LOG").unwrap_or_default()),
    };

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(log_level).fuse();
    slog::Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}

/// Shared HTTP client for the provider; appends the API key to every request.
pub struct JsonFetcher {
    logger: Logger,
    client: Client,
    api_key: String,
    timeout: Duration,
}

impl JsonFetcher {
    pub fn new(
        logger: Logger,
        user_agent: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<JsonFetcher, Error> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            logger,
            client,
            api_key,
            timeout,
        })
    }

    /// Single GET, no retries. Non-success statuses are classified by
    /// `ProviderError::from_status`.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        debug!(self.logger, "requesting: {}", url);
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        debug!(self.logger, "response status for {}: {}", url, status);
        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16()));
        }

        Ok(response.json::<T>().await?)
    }
}
