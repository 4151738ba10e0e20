use crate::helpers::{
    mock_current_conditions, mock_forecast_points, nagpur, spawn_pipeline, MockProvider,
    OverlappingProvider,
};
use agroweather::{
    derive_metrics, AcquisitionError, Capability, ConditionCategory, Coordinates, ErrorKind,
    PipelineState, ProviderError, QueryInput, UvReading, FORECAST_DAYS,
};
use mockall::predicate::eq;
use rand::{rngs::StdRng, SeedableRng};

#[tokio::test]
async fn can_build_report_for_city() {
    let mut provider = MockProvider::new();
    provider
        .expect_geocode()
        .withf(|query| query == "Nagpur")
        .times(1)
        .returning(|_| Ok(nagpur()));
    provider
        .expect_current_conditions()
        .with(eq(nagpur().coordinates))
        .times(1)
        .returning(|_| Ok(mock_current_conditions()));
    provider
        .expect_forecast()
        .times(1)
        .returning(|_| Capability::Available(mock_forecast_points(40)));
    provider
        .expect_uv_index()
        .times(1)
        .returning(|_| Capability::Available(UvReading::measured(9.3)));

    let pipeline = spawn_pipeline(provider);
    let report = pipeline
        .acquire_report(QueryInput::City(String::from("  Nagpur ")))
        .await
        .expect("report");

    assert_eq!(pipeline.state().await, PipelineState::Done);
    // geocoded name wins over the provider's name for the coordinates
    assert_eq!(report.location.to_string(), "Nagpur, IN");
    assert_eq!(report.uv, UvReading::measured(9.3));
    assert!(!report.forecast_synthesized);
    let labels: Vec<&str> = report.forecast.iter().map(|e| e.day_label.as_str()).collect();
    assert_eq!(labels, vec!["Today", "Tue", "Wed", "Thu", "Fri"]);
    let temps: Vec<f64> = report.forecast.iter().map(|e| e.temperature_c).collect();
    assert_eq!(temps, vec![25.0, 26.0, 27.0, 28.0, 29.0]);
}

#[tokio::test]
async fn unknown_location_skips_remaining_calls() {
    let mut provider = MockProvider::new();
    provider
        .expect_geocode()
        .times(1)
        .returning(|_| Err(ProviderError::NotFound));
    provider.expect_current_conditions().never();
    provider.expect_forecast().never();
    provider.expect_uv_index().never();

    let pipeline = spawn_pipeline(provider);
    let result = pipeline
        .acquire_report(QueryInput::City(String::from("Unknownville")))
        .await;

    assert_eq!(
        result,
        Err(AcquisitionError::LocationNotFound(String::from(
            "Unknownville"
        )))
    );
    assert_eq!(pipeline.state().await, PipelineState::LocationNotFound);
}

#[tokio::test]
async fn blank_city_is_not_found_without_geocoding() {
    let mut provider = MockProvider::new();
    provider.expect_geocode().never();
    provider.expect_current_conditions().never();

    let pipeline = spawn_pipeline(provider);
    let result = pipeline
        .acquire_report(QueryInput::City(String::from("   ")))
        .await;

    assert!(matches!(result, Err(AcquisitionError::LocationNotFound(_))));
}

#[tokio::test]
async fn geocoding_rate_limit_fails_query() {
    let mut provider = MockProvider::new();
    provider
        .expect_geocode()
        .returning(|_| Err(ProviderError::RateLimited));
    provider.expect_current_conditions().never();

    let pipeline = spawn_pipeline(provider);
    let err = pipeline
        .acquire_report(QueryInput::City(String::from("Pune")))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::RateLimited));
    assert_eq!(
        err,
        AcquisitionError::Failed {
            stage: PipelineState::Geocoding,
            source: ProviderError::RateLimited,
        }
    );
    assert_eq!(pipeline.state().await, PipelineState::Failed);
}

#[tokio::test]
async fn missing_forecast_is_synthesized() {
    let coordinates = Coordinates::new(18.52, 73.86);
    let mut provider = MockProvider::new();
    provider.expect_geocode().never();
    provider
        .expect_current_conditions()
        .with(eq(coordinates))
        .times(1)
        .returning(|_| Ok(mock_current_conditions()));
    provider
        .expect_forecast()
        .times(1)
        .returning(|_| Capability::unavailable(ProviderError::Upstream { status: 500 }));
    provider
        .expect_uv_index()
        .times(1)
        .returning(|_| Capability::Available(UvReading::measured(4.0)));

    let pipeline = spawn_pipeline(provider);
    let report = pipeline
        .acquire_report(QueryInput::Coordinates(coordinates))
        .await
        .expect("forecast failure must not fail the query");

    assert_eq!(pipeline.state().await, PipelineState::Done);
    assert!(report.forecast_synthesized);
    assert_eq!(report.forecast.len(), FORECAST_DAYS);
    assert_eq!(report.forecast[0].day_label, "Today");
    assert_eq!(report.forecast[0].temperature_c, 30.0);
    assert_eq!(report.forecast[0].condition, ConditionCategory::Clear);
    // without geocoding, the provider's name is used
    assert_eq!(report.location.display_name, "Nagpur Division");
    assert_eq!(report.coordinates, coordinates);
}

#[tokio::test]
async fn missing_uv_is_synthesized() {
    let mut provider = MockProvider::new();
    provider
        .expect_current_conditions()
        .returning(|_| Ok(mock_current_conditions()));
    provider
        .expect_forecast()
        .returning(|_| Capability::Available(mock_forecast_points(40)));
    provider
        .expect_uv_index()
        .times(1)
        .returning(|_| Capability::unavailable("uvi endpoint not available on this plan"));

    let pipeline = spawn_pipeline(provider);
    let report = pipeline
        .acquire_report(QueryInput::Coordinates(Coordinates::new(0.0, 0.0)))
        .await
        .expect("report");

    assert!(report.uv.synthesized);
    assert!((0.0..=10.0).contains(&report.uv.index));
    assert_eq!(report.uv.index.fract(), 0.0);
}

#[tokio::test]
async fn auth_rejection_on_current_conditions_fails_query() {
    let mut provider = MockProvider::new();
    provider
        .expect_geocode()
        .times(1)
        .returning(|_| Ok(nagpur()));
    provider
        .expect_current_conditions()
        .times(1)
        .returning(|_| Err(ProviderError::Auth));
    provider.expect_forecast().never();
    provider.expect_uv_index().never();

    let pipeline = spawn_pipeline(provider);
    let err = pipeline
        .acquire_report(QueryInput::City(String::from("Nagpur")))
        .await
        .unwrap_err();

    assert_eq!(pipeline.state().await, PipelineState::Failed);
    assert_eq!(err.kind(), Some(ErrorKind::AuthError));
    assert!(err.user_message().starts_with("Invalid API key"));
}

#[tokio::test]
async fn timeout_on_current_conditions_fails_query() {
    let mut provider = MockProvider::new();
    provider
        .expect_current_conditions()
        .returning(|_| Err(ProviderError::Timeout));
    provider.expect_forecast().never();

    let pipeline = spawn_pipeline(provider);
    let err = pipeline
        .acquire_report(QueryInput::Coordinates(Coordinates::new(1.0, 1.0)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::ProviderError));
}

#[tokio::test]
async fn newer_query_supersedes_older_one() {
    let pipeline = spawn_pipeline(OverlappingProvider::new());

    let (first, second) = tokio::join!(
        pipeline.acquire_report(QueryInput::City(String::from("Nagpur"))),
        pipeline.acquire_report(QueryInput::City(String::from("Nagpur"))),
    );

    assert_eq!(first, Err(AcquisitionError::Superseded));
    assert!(second.is_ok());
    assert_eq!(pipeline.state().await, PipelineState::Done);
}

#[tokio::test]
async fn seeded_pipeline_and_metrics_are_reproducible() {
    let build = || {
        let mut provider = MockProvider::new();
        provider
            .expect_current_conditions()
            .returning(|_| Ok(mock_current_conditions()));
        provider
            .expect_forecast()
            .returning(|_| Capability::unavailable("offline"));
        provider
            .expect_uv_index()
            .returning(|_| Capability::unavailable("offline"));
        spawn_pipeline(provider)
    };
    let input = QueryInput::Coordinates(Coordinates::new(21.1, 79.1));

    let first = build().acquire_report(input.clone()).await.expect("report");
    let second = build().acquire_report(input).await.expect("report");
    assert_eq!(first, second);

    let metrics = derive_metrics(&first.current, &mut StdRng::seed_from_u64(8));
    assert_eq!(metrics.soil_temperature_c, 27);
    assert_eq!(metrics.dew_point_c, 24);
    assert_eq!(metrics.precipitation_chance_pct, 10);
    assert_eq!(metrics.heat_index_c, 35);
    assert_eq!(
        metrics,
        derive_metrics(&first.current, &mut StdRng::seed_from_u64(8))
    );
}
