//! Clients and wire types for the two backend proxy endpoints.
//!
//! The proxy holds the OpenWeather key; requests carry only the query.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    coordinate::Coordinate,
    date::QueryDate,
    error::FetchError,
    model::{ClimateResult, CurrentWeatherResult, Metric},
    provider::{ClimateSource, CurrentWeatherSource, http::send, nasa_power, openweather},
};

/// Body of `POST /weather`. Coordinates travel as the form's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherProxyRequest {
    pub lat: String,
    pub lng: String,
    pub date: String,
}

/// Success body of `POST /weather`. Wind is already km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherProxyResponse {
    pub average_temperature: Option<f64>,
    pub average_humidity: Option<f64>,
    pub average_wind_speed: Option<f64>,
    pub total_precipitation: Option<f64>,
}

impl From<&CurrentWeatherResult> for WeatherProxyResponse {
    fn from(r: &CurrentWeatherResult) -> Self {
        Self {
            average_temperature: r.temperature_c.value(),
            average_humidity: r.humidity_pct.value(),
            average_wind_speed: r.wind_speed_kmh.value(),
            total_precipitation: r.rainfall_mm_1h.value(),
        }
    }
}

impl From<WeatherProxyResponse> for CurrentWeatherResult {
    fn from(r: WeatherProxyResponse) -> Self {
        Self {
            temperature_c: Metric::from_option(r.average_temperature),
            humidity_pct: Metric::from_option(r.average_humidity),
            wind_speed_kmh: Metric::from_option(r.average_wind_speed),
            rainfall_mm_1h: Metric::or_none_recorded(r.total_precipitation),
        }
    }
}

/// Body of `POST /fetch-nasa-power`; `date` is `YYYYMMDD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateProxyRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub date: String,
}

/// Success body of `POST /fetch-nasa-power`. Wind is km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateProxyResponse {
    pub temperature: Option<f64>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub precipitation: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub solar_radiation: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&ClimateResult> for ClimateProxyResponse {
    fn from(r: &ClimateResult) -> Self {
        Self {
            temperature: r.temperature_avg_c.value(),
            temperature_max: r.temperature_max_c.value(),
            temperature_min: r.temperature_min_c.value(),
            precipitation: r.precipitation_mm_day.value(),
            humidity: r.humidity_pct.value(),
            wind_speed: r.wind_speed_kmh.value(),
            solar_radiation: r.solar_radiation_kwh_m2_day.value(),
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

impl From<ClimateProxyResponse> for ClimateResult {
    fn from(r: ClimateProxyResponse) -> Self {
        Self {
            temperature_avg_c: Metric::from_option(r.temperature),
            temperature_max_c: Metric::from_option(r.temperature_max),
            temperature_min_c: Metric::from_option(r.temperature_min),
            precipitation_mm_day: Metric::from_option(r.precipitation),
            humidity_pct: Metric::from_option(r.humidity),
            wind_speed_kmh: Metric::from_option(r.wind_speed),
            solar_radiation_kwh_m2_day: Metric::from_option(r.solar_radiation),
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

/// Error body of either endpoint. `details` is only sent by the climate proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Current weather through `POST /weather`.
#[derive(Debug, Clone)]
pub struct WeatherProxyClient {
    url: String,
    http: Client,
}

impl WeatherProxyClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }
}

#[async_trait]
impl CurrentWeatherSource for WeatherProxyClient {
    fn name(&self) -> &'static str {
        openweather::SOURCE_NAME
    }

    async fn current(
        &self,
        coordinate: Coordinate,
        date: QueryDate,
    ) -> Result<CurrentWeatherResult, FetchError> {
        let (lat, lng) = coordinate.to_form_text();
        let payload = WeatherProxyRequest {
            lat,
            lng,
            date: date.iso(),
        };

        let body = send(self.name(), self.http.post(&self.url).json(&payload)).await?;
        let parsed: WeatherProxyResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
                source_name: self.name(),
                reason: e.to_string(),
            })?;

        Ok(parsed.into())
    }
}

/// Daily climate through `POST /fetch-nasa-power`.
#[derive(Debug, Clone)]
pub struct ClimateProxyClient {
    url: String,
    http: Client,
}

impl ClimateProxyClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }
}

#[async_trait]
impl ClimateSource for ClimateProxyClient {
    fn name(&self) -> &'static str {
        nasa_power::SOURCE_NAME
    }

    async fn daily(
        &self,
        coordinate: Coordinate,
        date: QueryDate,
    ) -> Result<ClimateResult, FetchError> {
        let payload = ClimateProxyRequest {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
            date: date.compact(),
        };

        let body = send(self.name(), self.http.post(&self.url).json(&payload)).await?;
        let parsed: ClimateProxyResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed {
                source_name: self.name(),
                reason: e.to_string(),
            })?;

        Ok(parsed.into())
    }
}
