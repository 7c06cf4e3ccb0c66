use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    coordinate::Coordinate,
    date::QueryDate,
    error::FetchError,
    model::{CurrentWeatherResult, Metric},
    provider::{
        CurrentWeatherSource,
        http::{join_url, send},
    },
};

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";
pub(crate) const SOURCE_NAME: &str = "OpenWeather";

/// m/s to km/h.
pub const MPS_TO_KMH: f64 = 3.6;

/// Direct OpenWeather client. Holds the API key, so it only belongs on
/// the trusted side (the proxy, or a locally configured CLI).
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into().trim().to_string(),
            base_url: OPENWEATHER_BASE_URL.to_string(),
            http,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_current(&self, coordinate: Coordinate) -> Result<CurrentWeatherResult, FetchError> {
        let url = join_url(&self.base_url, "data/2.5/weather");
        let lat = coordinate.latitude().to_string();
        let lon = coordinate.longitude().to_string();

        let request = self.http.get(url).query(&[
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ]);

        let body = send(SOURCE_NAME, request).await?;
        parse_current(&body)
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwCurrentResponse {
    main: Option<OwMain>,
    wind: Option<OwWind>,
    rain: Option<OwRain>,
}

/// Map an OpenWeather `/data/2.5/weather` body (metric units).
///
/// Each missing field only degrades its own metric. Rain is omitted by
/// OpenWeather when none fell, so it becomes `NoneRecorded`.
pub fn parse_current(body: &str) -> Result<CurrentWeatherResult, FetchError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed {
            source_name: SOURCE_NAME,
            reason: e.to_string(),
        })?;

    let main = parsed.main.unwrap_or_default();
    let wind = parsed.wind.unwrap_or_default();
    let rain = parsed.rain.unwrap_or_default();

    Ok(CurrentWeatherResult {
        temperature_c: Metric::from_option(main.temp),
        humidity_pct: Metric::from_option(main.humidity),
        wind_speed_kmh: Metric::from_option(wind.speed).map(|mps| mps * MPS_TO_KMH),
        rainfall_mm_1h: Metric::or_none_recorded(rain.one_hour),
    })
}

#[async_trait]
impl CurrentWeatherSource for OpenWeatherClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    /// OpenWeather's free tier only reports the present moment, so the
    /// date is not sent.
    async fn current(
        &self,
        coordinate: Coordinate,
        _date: QueryDate,
    ) -> Result<CurrentWeatherResult, FetchError> {
        self.fetch_current(coordinate).await
    }
}
