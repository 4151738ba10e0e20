use crate::helpers::{spawn_provider_app, CannedResponse, TEST_API_KEY};
use agroweather::{
    Capability, ConditionCategory, Coordinates, ProviderError, UvReading, WeatherProvider,
};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

const CURRENT_BODY: &str = r#"{
    "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
    "main": {"temp": 31.2, "feels_like": 33.0, "pressure": 1004, "humidity": 55},
    "visibility": 8000,
    "wind": {"speed": 2.5},
    "dt": 1723442400,
    "sys": {"country": "IN"},
    "name": "Nagpur"
}"#;

const FORECAST_BODY: &str = r#"{
    "list": [
        {"dt": 1723442400, "main": {"temp": 29.0}, "weather": [{"main": "Rain", "description": "light rain"}]},
        {"dt": 1723453200, "main": {"temp": 28.0}, "weather": [{"main": "Clouds", "description": "overcast clouds"}]}
    ]
}"#;

fn nagpur() -> Coordinates {
    Coordinates::new(21.1458, 79.0882)
}

#[tokio::test]
async fn geocode_not_found_status_is_not_found() {
    let app = spawn_provider_app(
        vec![CannedResponse::new("/geo/1.0/direct", 404, r#"{"cod":"404"}"#)],
        TIMEOUT,
    )
    .await;

    let result = app.client.geocode("Atlantis").await;

    assert_eq!(result, Err(ProviderError::NotFound));
}

#[tokio::test]
async fn geocode_empty_list_is_not_found() {
    let app = spawn_provider_app(
        vec![CannedResponse::new("/geo/1.0/direct", 200, "[]")],
        TIMEOUT,
    )
    .await;

    let result = app.client.geocode("Atlantis").await;

    assert_eq!(result, Err(ProviderError::NotFound));
    let requests = app.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains("q=Atlantis"));
    assert!(requests[0].contains("limit=1"));
    assert!(requests[0].contains(&format!("appid={}", TEST_API_KEY)));
}

#[tokio::test]
async fn geocode_returns_first_match() {
    let app = spawn_provider_app(
        vec![CannedResponse::new(
            "/geo/1.0/direct",
            200,
            r#"[{"name": "Nagpur", "lat": 21.1458, "lon": 79.0882, "country": "IN", "state": "Maharashtra"}]"#,
        )],
        TIMEOUT,
    )
    .await;

    let location = app.client.geocode("Nagpur").await.expect("location");

    assert_eq!(location.identity.to_string(), "Nagpur, IN");
    assert_eq!(location.coordinates, nagpur());
}

#[tokio::test]
async fn current_conditions_unauthorized_is_auth_error() {
    let app = spawn_provider_app(
        vec![CannedResponse::new(
            "/data/2.5/weather",
            401,
            r#"{"cod":401,"message":"Invalid API key"}"#,
        )],
        TIMEOUT,
    )
    .await;

    let result = app.client.current_conditions(nagpur()).await;

    assert_eq!(result, Err(ProviderError::Auth));
}

#[tokio::test]
async fn current_conditions_rate_limited() {
    let app = spawn_provider_app(
        vec![CannedResponse::new("/data/2.5/weather", 429, "{}")],
        TIMEOUT,
    )
    .await;

    let result = app.client.current_conditions(nagpur()).await;

    assert_eq!(result, Err(ProviderError::RateLimited));
}

#[tokio::test]
async fn slow_response_times_out() {
    let app = spawn_provider_app(
        vec![CannedResponse::new("/data/2.5/weather", 200, CURRENT_BODY)
            .delayed(Duration::from_millis(1500))],
        Duration::from_millis(300),
    )
    .await;

    let result = app.client.current_conditions(nagpur()).await;

    assert_eq!(result, Err(ProviderError::Timeout));
}

#[tokio::test]
async fn current_conditions_request_is_metric_and_keyed() {
    let app = spawn_provider_app(
        vec![CannedResponse::new("/data/2.5/weather", 200, CURRENT_BODY)],
        TIMEOUT,
    )
    .await;

    let current = app
        .client
        .current_conditions(nagpur())
        .await
        .expect("current conditions");

    assert_eq!(current.location.to_string(), "Nagpur, IN");
    assert_eq!(current.snapshot.condition, ConditionCategory::Clear);
    assert_eq!(current.snapshot.humidity_pct, 55);
    let requests = app.requests();
    assert!(requests[0].starts_with("/data/2.5/weather?"));
    assert!(requests[0].contains("lat=21.1458"));
    assert!(requests[0].contains("lon=79.0882"));
    assert!(requests[0].contains("units=metric"));
    assert!(requests[0].contains(&format!("appid={}", TEST_API_KEY)));
}

#[tokio::test]
async fn forecast_server_error_is_unavailable() {
    let app = spawn_provider_app(
        vec![CannedResponse::new("/data/2.5/forecast", 500, "{}")],
        TIMEOUT,
    )
    .await;

    let forecast = app.client.forecast(nagpur()).await;

    assert_eq!(
        forecast,
        Capability::Unavailable {
            reason: String::from("provider returned status 500")
        }
    );
}

#[tokio::test]
async fn forecast_points_are_decoded() {
    let app = spawn_provider_app(
        vec![CannedResponse::new("/data/2.5/forecast", 200, FORECAST_BODY)],
        TIMEOUT,
    )
    .await;

    let points = match app.client.forecast(nagpur()).await {
        Capability::Available(points) => points,
        Capability::Unavailable { reason } => panic!("forecast unavailable: {}", reason),
    };

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].condition, ConditionCategory::Rain);
    assert_eq!(points[1].temperature_c, 28.0);
    let requests = app.requests();
    assert!(requests[0].contains("units=metric"));
    assert!(requests[0].contains(&format!("appid={}", TEST_API_KEY)));
}

#[tokio::test]
async fn malformed_uv_body_is_unavailable() {
    let app = spawn_provider_app(
        vec![CannedResponse::new("/data/2.5/uvi", 200, "not json")],
        TIMEOUT,
    )
    .await;

    let uv = app.client.uv_index(nagpur()).await;

    assert!(!uv.is_available());
    let requests = app.requests();
    assert!(requests[0].starts_with("/data/2.5/uvi?"));
    assert!(requests[0].contains(&format!("appid={}", TEST_API_KEY)));
}

#[tokio::test]
async fn uv_reading_is_measured() {
    let app = spawn_provider_app(
        vec![CannedResponse::new(
            "/data/2.5/uvi",
            200,
            r#"{"lat": 21.15, "lon": 79.09, "date_iso": "2024-08-12T12:00:00Z", "date": 1723464000, "value": 9.1}"#,
        )],
        TIMEOUT,
    )
    .await;

    let uv = app.client.uv_index(nagpur()).await;

    assert_eq!(uv, Capability::Available(UvReading::measured(9.1)));
}
