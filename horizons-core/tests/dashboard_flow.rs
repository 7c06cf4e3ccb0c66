//! End-to-end dashboard submissions through both source modes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use horizons_core::{
    ClimateResult, ClimateSource, Coordinate, CurrentWeatherResult, CurrentWeatherSource,
    Dashboard, FetchError, Metric, NotificationLevel, Orchestrator, QueryDate, Submission,
    provider::{
        build_http_client,
        nasa_power::NasaPowerClient,
        openweather::OpenWeatherClient,
        proxy::{ClimateProxyClient, WeatherProxyClient},
    },
};
use tokio::sync::Notify;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn proxy_dashboard(server: &MockServer) -> Dashboard {
    let http = build_http_client().unwrap();
    Dashboard::new(Orchestrator::new(
        Arc::new(WeatherProxyClient::new(
            http.clone(),
            format!("{}/weather", server.uri()),
        )),
        Arc::new(ClimateProxyClient::new(
            http,
            format!("{}/fetch-nasa-power", server.uri()),
        )),
    ))
}

fn card_text(cards: &[horizons_core::presentation::Card], title: &str) -> String {
    cards
        .iter()
        .find(|c| c.title == title)
        .unwrap_or_else(|| panic!("no card titled {title}"))
        .to_string()
}

#[tokio::test]
async fn proxy_path_shows_wind_without_converting_again() {
    let server = MockServer::start().await;
    let today = QueryDate::today();

    Mock::given(method("POST"))
        .and(path("/weather"))
        .and(body_json(serde_json::json!({
            "lat": "40.7128",
            "lng": "-74.006",
            "date": today.iso(),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "average_temperature": 18.3,
            "average_humidity": 60,
            "average_wind_speed": 14.4,
            "total_precipitation": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/fetch-nasa-power"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "temperature": 5.2, "temperatureMax": 8.1, "temperatureMin": 2.0,
            "precipitation": 0.0, "humidity": 70.5, "windSpeed": 12.3,
            "solarRadiation": 3.45, "latitude": 40.7128, "longitude": -74.006
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = proxy_dashboard(&server);
    dashboard
        .selection()
        .select_from_form("40.7128", "-74.0060")
        .unwrap();

    let submission = dashboard.submit(today).await.unwrap();
    assert!(matches!(submission, Submission::Applied { .. }));

    let panels = dashboard.panels();
    let current = panels.current_cards().unwrap();
    assert_eq!(card_text(&current, "Temperature"), "18.3°C");
    assert_eq!(card_text(&current, "Wind Speed"), "14.4 km/h");
    assert_eq!(card_text(&current, "Rainfall"), "0.0 mm");
}

#[tokio::test]
async fn direct_path_converts_wind_locally() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "main": {"temp": 18.3, "humidity": 60},
            "wind": {"speed": 4.0}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/temporal/daily/point"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "properties": {"parameter": {"T2M": {}}}
        })))
        .mount(&server)
        .await;

    let http = build_http_client().unwrap();
    let dashboard = Dashboard::new(Orchestrator::new(
        Arc::new(OpenWeatherClient::new(http.clone(), "KEY").with_base_url(server.uri())),
        Arc::new(NasaPowerClient::new(http).with_base_url(server.uri())),
    ));
    dashboard.selection().select_from_map(40.7128, -74.006);

    dashboard.submit(QueryDate::today()).await.unwrap();

    let panels = dashboard.panels();
    let current = panels.current_cards().unwrap();
    assert_eq!(card_text(&current, "Temperature"), "18.3°C");
    assert_eq!(card_text(&current, "Wind Speed"), "14.4 km/h");
    assert_eq!(card_text(&current, "Rainfall"), "0");

    let climate = panels.climate_cards().unwrap();
    assert_eq!(card_text(&climate, "Humidity"), "unavailable");
    assert_eq!(card_text(&climate, "Temp Range"), "unavailable");
}

#[tokio::test]
async fn proxy_401_marks_current_cards_and_still_shows_climate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"error": "Invalid OpenWeather API key"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/fetch-nasa-power"))
        .and(body_json(serde_json::json!({
            "latitude": 40.7128,
            "longitude": -74.006,
            "date": "20240101"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "temperature": 5.2, "temperatureMax": 8.1, "temperatureMin": 2.0,
            "precipitation": 0.00, "humidity": 70.5, "windSpeed": 12.3,
            "solarRadiation": 3.45, "latitude": null, "longitude": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = proxy_dashboard(&server);
    dashboard.selection().select_from_map(40.7128, -74.006);

    let Submission::Applied { notifications } = dashboard
        .submit(QueryDate::parse("20240101").unwrap())
        .await
        .unwrap()
    else {
        panic!("expected results to be applied");
    };

    let error = notifications
        .iter()
        .find(|n| n.level == NotificationLevel::Error)
        .expect("error notification");
    assert!(error.description.contains("Invalid"));
    assert!(error.description.contains("API key"));

    let panels = dashboard.panels();
    assert!(
        panels
            .current_cards()
            .unwrap()
            .iter()
            .all(|c| c.value_text() == "Error")
    );

    let climate = panels.climate_cards().unwrap();
    assert_eq!(
        climate
            .iter()
            .find(|c| c.title == "Temp Range")
            .unwrap()
            .value_text(),
        "2.0 - 8.1"
    );
    assert_eq!(card_text(&climate, "Precipitation"), "0.00 mm/day");
}

#[tokio::test]
async fn future_date_never_reaches_climate_proxy() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "average_temperature": 1.0,
            "average_humidity": 2.0,
            "average_wind_speed": 3.0,
            "total_precipitation": null
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/fetch-nasa-power"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dashboard = proxy_dashboard(&server);
    dashboard.selection().select_from_map(0.0, 0.0);

    let tomorrow = QueryDate::new(QueryDate::today().date().succ_opt().unwrap());
    dashboard.submit(tomorrow).await.unwrap();

    assert!(dashboard.panels().climate_cards().is_none());
    assert_eq!(dashboard.panels().current_cards().unwrap()[3].value_text(), "0");
}

/// Current-weather source whose first call blocks until released.
#[derive(Debug)]
struct GatedCurrent {
    calls: AtomicUsize,
    gate: Notify,
    entered: Notify,
}

#[async_trait]
impl CurrentWeatherSource for GatedCurrent {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn current(
        &self,
        coordinate: Coordinate,
        _date: QueryDate,
    ) -> Result<CurrentWeatherResult, FetchError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.entered.notify_one();
            self.gate.notified().await;
        }
        Ok(CurrentWeatherResult {
            temperature_c: Metric::Value(coordinate.latitude()),
            humidity_pct: Metric::Unavailable,
            wind_speed_kmh: Metric::Unavailable,
            rainfall_mm_1h: Metric::NoneRecorded,
        })
    }
}

#[derive(Debug)]
struct NoClimate;

#[async_trait]
impl ClimateSource for NoClimate {
    fn name(&self) -> &'static str {
        "none"
    }

    async fn daily(
        &self,
        _coordinate: Coordinate,
        _date: QueryDate,
    ) -> Result<ClimateResult, FetchError> {
        Err(FetchError::Network {
            source_name: "none",
            reason: "offline".into(),
        })
    }
}

#[tokio::test]
async fn late_response_from_older_submission_is_dropped() {
    let current = Arc::new(GatedCurrent {
        calls: AtomicUsize::new(0),
        gate: Notify::new(),
        entered: Notify::new(),
    });
    let dashboard = Dashboard::new(Orchestrator::new(current.clone(), Arc::new(NoClimate)));
    let today = QueryDate::today();

    dashboard.selection().select_from_map(11.0, 0.0);
    let first = dashboard.submit(today);

    let second = async {
        current.entered.notified().await;
        dashboard.selection().select_from_map(22.0, 0.0);
        let outcome = dashboard.submit(today).await;
        current.gate.notify_one();
        outcome
    };

    let (first, second) = tokio::join!(first, second);

    assert_eq!(first.unwrap(), Submission::Superseded);
    assert!(matches!(second.unwrap(), Submission::Applied { .. }));

    let panels = dashboard.panels();
    assert_eq!(panels.current_cards().unwrap()[0].to_string(), "22.0°C");
    assert_eq!(panels.query.unwrap().0, Coordinate::new(22.0, 0.0).unwrap());
}
