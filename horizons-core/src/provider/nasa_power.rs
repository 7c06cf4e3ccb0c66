use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    coordinate::Coordinate,
    date::QueryDate,
    error::FetchError,
    model::{ClimateResult, Metric},
    provider::{
        ClimateSource,
        http::{join_url, send},
        openweather::MPS_TO_KMH,
    },
};

pub const NASA_POWER_BASE_URL: &str = "https://power.larc.nasa.gov";
pub(crate) const SOURCE_NAME: &str = "NASA POWER";

/// Temperature, precipitation, humidity, wind, solar radiation, min/max temperature.
pub const PARAMETERS: &str = "T2M,PRECTOTCORR,RH2M,WS10M,ALLSKY_SFC_SW_DWN,T2M_MAX,T2M_MIN";
/// Agroclimatology community: kWh/m²/day for radiation, mm/day for precipitation.
pub const COMMUNITY: &str = "AG";
/// POWER's marker for "no data for this day".
const FILL_VALUE: f64 = -999.0;

#[derive(Debug, Clone)]
pub struct NasaPowerClient {
    base_url: String,
    http: Client,
}

impl NasaPowerClient {
    pub fn new(http: Client) -> Self {
        Self {
            base_url: NASA_POWER_BASE_URL.to_string(),
            http,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_day(
        &self,
        coordinate: Coordinate,
        date: QueryDate,
    ) -> Result<ClimateResult, FetchError> {
        let url = join_url(&self.base_url, "api/temporal/daily/point");
        let lat = coordinate.latitude().to_string();
        let lon = coordinate.longitude().to_string();
        let day = date.compact();

        let request = self.http.get(url).query(&[
            ("parameters", PARAMETERS),
            ("community", COMMUNITY),
            ("longitude", lon.as_str()),
            ("latitude", lat.as_str()),
            ("start", day.as_str()),
            ("end", day.as_str()),
            ("format", "JSON"),
        ]);

        let body = send(SOURCE_NAME, request).await?;
        parse_daily(&body, date)
    }
}

#[derive(Debug, Deserialize)]
struct PowerGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: Option<HashMap<String, HashMap<String, Option<f64>>>>,
}

#[derive(Debug, Deserialize)]
struct PowerResponse {
    geometry: Option<PowerGeometry>,
    properties: Option<PowerProperties>,
}

/// Map a POWER daily-point body to the values for `date`.
///
/// A body without any parameter block is malformed; a single parameter
/// missing, null, or holding the fill value only marks that metric
/// unavailable.
pub fn parse_daily(body: &str, date: QueryDate) -> Result<ClimateResult, FetchError> {
    let malformed = |reason: String| FetchError::Malformed {
        source_name: SOURCE_NAME,
        reason,
    };

    let parsed: PowerResponse = serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;

    let parameters = parsed
        .properties
        .and_then(|p| p.parameter)
        .ok_or_else(|| malformed("no parameter data in response".to_string()))?;

    let key = date.compact();
    let value = |name: &str| -> Metric {
        let raw = parameters
            .get(name)
            .and_then(|series| series.get(&key))
            .copied()
            .flatten()
            .filter(|v| *v > FILL_VALUE);
        Metric::from_option(raw)
    };

    // GeoJSON order: [longitude, latitude, elevation].
    let coordinates = parsed.geometry.map(|g| g.coordinates).unwrap_or_default();

    Ok(ClimateResult {
        temperature_avg_c: value("T2M"),
        temperature_max_c: value("T2M_MAX"),
        temperature_min_c: value("T2M_MIN"),
        precipitation_mm_day: value("PRECTOTCORR"),
        humidity_pct: value("RH2M"),
        wind_speed_kmh: value("WS10M").map(|mps| mps * MPS_TO_KMH),
        solar_radiation_kwh_m2_day: value("ALLSKY_SFC_SW_DWN"),
        latitude: coordinates.get(1).copied(),
        longitude: coordinates.first().copied(),
    })
}

#[async_trait]
impl ClimateSource for NasaPowerClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn daily(
        &self,
        coordinate: Coordinate,
        date: QueryDate,
    ) -> Result<ClimateResult, FetchError> {
        self.fetch_day(coordinate, date).await
    }
}
