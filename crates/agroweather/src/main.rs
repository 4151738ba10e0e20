use agroweather::{
    derive_metrics, get_config_info, render_dashboard, setup_logger, AcquisitionError,
    AcquisitionPipeline, DashboardView, JsonFetcher, OpenWeatherClient,
};
use anyhow::anyhow;
use slog::{error, info};
use std::{process::ExitCode, sync::Arc};

#[tokio::main]
async fn main() -> Result<ExitCode, anyhow::Error> {
    let cli = get_config_info()?;
    let logger = setup_logger(&cli);

    info!(logger, "Agroweather starting...");
    info!(logger, "  API base: {}", cli.api_base());
    info!(logger, "  Geocoding base: {}", cli.geo_base());
    info!(logger, "  Request timeout: {:?}", cli.request_timeout());

    let api_key = cli
        .api_key()
        .ok_or_else(|| anyhow!("no API key configured, set --api-key or AGROWEATHER_API_KEY"))?;

    let fetcher = Arc::new(JsonFetcher::new(
        logger.clone(),
        cli.user_agent(),
        api_key,
        cli.request_timeout(),
    )?);
    let provider = Arc::new(OpenWeatherClient::new(
        logger.clone(),
        fetcher,
        cli.api_base(),
        cli.geo_base(),
    ));
    let mut rng = cli.rng();
    let pipeline = AcquisitionPipeline::new(logger.clone(), provider, cli.rng());

    let input = cli.query_input();
    info!(logger, "querying {:?}", input);

    let report = match pipeline.acquire_report(input).await {
        Ok(report) => report,
        Err(err @ AcquisitionError::LocationNotFound(_)) => {
            eprintln!("{}", err.user_message());
            return Ok(ExitCode::from(2));
        }
        Err(err) => {
            error!(logger, "Error fetching weather: {}", err);
            eprintln!("{}", err.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    let metrics = derive_metrics(&report.current, &mut rng);
    let view = DashboardView::new(&report, &metrics);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_dashboard(&view));
    }
    Ok(ExitCode::SUCCESS)
}
