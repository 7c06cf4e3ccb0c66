//! Direct source clients against a mock HTTP server.

use chrono::NaiveDate;
use horizons_core::{
    ClimateSource, Coordinate, CurrentWeatherSource, FetchError, Metric, QueryDate,
    provider::{build_http_client, nasa_power::NasaPowerClient, openweather::OpenWeatherClient},
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn nyc() -> Coordinate {
    Coordinate::new(40.7128, -74.006).unwrap()
}

fn jan_first() -> QueryDate {
    QueryDate::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
}

fn openweather(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new(build_http_client().unwrap(), "TEST_KEY").with_base_url(server.uri())
}

fn nasa(server: &MockServer) -> NasaPowerClient {
    NasaPowerClient::new(build_http_client().unwrap()).with_base_url(server.uri())
}

#[tokio::test]
async fn openweather_sends_metric_query_and_converts_wind() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "40.7128"))
        .and(query_param("lon", "-74.006"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "main": {"temp": 18.3, "humidity": 60},
            "wind": {"speed": 4.0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = openweather(&server).current(nyc(), jan_first()).await.unwrap();

    assert_eq!(result.temperature_c, Metric::Value(18.3));
    assert_eq!(result.humidity_pct, Metric::Value(60.0));
    assert_eq!(result.wind_speed_kmh.value().map(|v| format!("{v:.1}")), Some("14.4".into()));
    assert_eq!(result.rainfall_mm_1h, Metric::NoneRecorded);
}

#[tokio::test]
async fn openweather_401_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
        })))
        .mount(&server)
        .await;

    let err = openweather(&server).current(nyc(), jan_first()).await.unwrap_err();

    assert_eq!(
        err,
        FetchError::Auth {
            source_name: "OpenWeather"
        }
    );
    assert_eq!(err.to_string(), "Invalid OpenWeather API key");
}

#[tokio::test]
async fn openweather_429_is_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = openweather(&server).current(nyc(), jan_first()).await.unwrap_err();
    assert!(matches!(err, FetchError::RateLimited { .. }));
}

#[tokio::test]
async fn openweather_other_status_carries_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"cod": "400", "message": "wrong latitude"})),
        )
        .mount(&server)
        .await;

    let err = openweather(&server).current(nyc(), jan_first()).await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Upstream {
            source_name: "OpenWeather",
            status: 400,
            message: Some("wrong latitude".into()),
        }
    );
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let client = OpenWeatherClient::new(build_http_client().unwrap(), "KEY")
        .with_base_url("http://127.0.0.1:1");

    let err = client.current(nyc(), jan_first()).await.unwrap_err();
    assert!(matches!(err, FetchError::Network { .. }), "{err:?}");
}

#[tokio::test]
async fn nasa_power_sends_compact_date_and_parameter_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/temporal/daily/point"))
        .and(query_param(
            "parameters",
            "T2M,PRECTOTCORR,RH2M,WS10M,ALLSKY_SFC_SW_DWN,T2M_MAX,T2M_MIN",
        ))
        .and(query_param("community", "AG"))
        .and(query_param("latitude", "40.7128"))
        .and(query_param("longitude", "-74.006"))
        .and(query_param("start", "20240101"))
        .and(query_param("end", "20240101"))
        .and(query_param("format", "JSON"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "geometry": {"coordinates": [-74.006, 40.7128, 10.0]},
            "properties": {"parameter": {
                "T2M": {"20240101": 5.2},
                "T2M_MAX": {"20240101": 8.1},
                "T2M_MIN": {"20240101": 2.0},
                "PRECTOTCORR": {"20240101": 0.0},
                "RH2M": {"20240101": 70.5},
                "WS10M": {"20240101": 5.0},
                "ALLSKY_SFC_SW_DWN": {"20240101": 3.45}
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = nasa(&server).daily(nyc(), jan_first()).await.unwrap();

    assert_eq!(result.temperature_min_c, Metric::Value(2.0));
    assert_eq!(result.precipitation_mm_day, Metric::Value(0.0));
    assert_eq!(result.wind_speed_kmh, Metric::Value(18.0));
    assert_eq!(result.latitude, Some(40.7128));
}

#[tokio::test]
async fn nasa_power_error_status_is_upstream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "messages": ["The start date is after the last available date"]
        })))
        .mount(&server)
        .await;

    let err = nasa(&server).daily(nyc(), jan_first()).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert!(err.to_string().contains("last available date"));
}
