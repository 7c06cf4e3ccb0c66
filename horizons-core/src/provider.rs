use crate::{
    Config,
    coordinate::Coordinate,
    date::QueryDate,
    error::FetchError,
    model::{ClimateResult, CurrentWeatherResult},
    provider::{
        nasa_power::NasaPowerClient,
        openweather::OpenWeatherClient,
        proxy::{ClimateProxyClient, WeatherProxyClient},
    },
};
use anyhow::Context;
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod http;
pub mod nasa_power;
pub mod openweather;
pub mod proxy;

pub use http::build_http_client;

/// How the dashboard reaches the two third-party services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceMode {
    /// Call OpenWeather and NASA POWER directly with a locally held key.
    Direct,
    /// Go through the backend proxy endpoints, which hold the key.
    Proxy,
}

impl SourceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceMode::Direct => "direct",
            SourceMode::Proxy => "proxy",
        }
    }

    pub const fn all() -> &'static [SourceMode] {
        &[SourceMode::Direct, SourceMode::Proxy]
    }
}

impl std::fmt::Display for SourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "direct" => Ok(SourceMode::Direct),
            "proxy" => Ok(SourceMode::Proxy),
            _ => Err(anyhow::anyhow!(
                "Unknown source mode '{value}'. Supported modes: direct, proxy."
            )),
        }
    }
}

/// Present-moment conditions for a coordinate.
#[async_trait]
pub trait CurrentWeatherSource: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    async fn current(
        &self,
        coordinate: Coordinate,
        date: QueryDate,
    ) -> Result<CurrentWeatherResult, FetchError>;
}

/// Daily satellite aggregates for a coordinate. Has no data for future days.
#[async_trait]
pub trait ClimateSource: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    async fn daily(
        &self,
        coordinate: Coordinate,
        date: QueryDate,
    ) -> Result<ClimateResult, FetchError>;
}

/// The pair of sources one dashboard talks to.
#[derive(Debug, Clone)]
pub struct Sources {
    pub current: Arc<dyn CurrentWeatherSource>,
    pub climate: Arc<dyn ClimateSource>,
}

/// Direct clients from config. The OpenWeather client is `None` when no
/// key is configured.
pub fn direct_clients(
    config: &Config,
    http: reqwest::Client,
) -> (Option<OpenWeatherClient>, NasaPowerClient) {
    let openweather = config.openweather_api_key().map(|key| {
        let client = OpenWeatherClient::new(http.clone(), key);
        match &config.openweather.base_url {
            Some(url) => client.with_base_url(url),
            None => client,
        }
    });

    let nasa = NasaPowerClient::new(http);
    let nasa = match &config.nasa_power.base_url {
        Some(url) => nasa.with_base_url(url),
        None => nasa,
    };

    (openweather, nasa)
}

/// Construct both sources for an explicit mode.
pub fn sources_for_mode(mode: SourceMode, config: &Config) -> anyhow::Result<Sources> {
    let http = build_http_client().context("Failed to build HTTP client")?;

    let sources = match mode {
        SourceMode::Direct => {
            let (openweather, nasa) = direct_clients(config, http);
            let openweather = openweather.ok_or_else(|| {
                anyhow::anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `horizons configure` and enter your API key, or set {}.",
                    crate::config::API_KEY_ENV
                )
            })?;

            Sources {
                current: Arc::new(openweather),
                climate: Arc::new(nasa),
            }
        }
        SourceMode::Proxy => {
            let missing = |what: &str| {
                anyhow::anyhow!(
                    "No proxy {what} URL configured.\n\
                     Hint: run `horizons configure` and choose proxy mode."
                )
            };
            let weather_url = config
                .proxy
                .weather_url
                .clone()
                .ok_or_else(|| missing("weather"))?;
            let climate_url = config
                .proxy
                .climate_url
                .clone()
                .ok_or_else(|| missing("climate"))?;

            Sources {
                current: Arc::new(WeatherProxyClient::new(http.clone(), weather_url)),
                climate: Arc::new(ClimateProxyClient::new(http, climate_url)),
            }
        }
    };

    Ok(sources)
}

/// Construct both sources using the configured mode.
pub fn sources_from_config(config: &Config) -> anyhow::Result<Sources> {
    let mode = config.effective_source_mode()?;
    sources_for_mode(mode, config)
}
