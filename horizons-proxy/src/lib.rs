//! Backend proxy endpoints for the dashboard.
//!
//! `POST /weather` fronts OpenWeather and keeps the API key server-side.
//! `POST /fetch-nasa-power` fronts NASA POWER. Both answer CORS preflight.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::post,
};
use horizons_core::{
    ClimateSource, Config, Coordinate, CurrentWeatherSource, FetchError, QueryDate,
    provider::{
        build_http_client, direct_clients,
        proxy::{
            ClimateProxyRequest, ClimateProxyResponse, ProxyErrorBody, WeatherProxyRequest,
            WeatherProxyResponse,
        },
    },
};

pub const WEATHER_PATH: &str = "/weather";
pub const CLIMATE_PATH: &str = "/fetch-nasa-power";

const ALLOW_ORIGIN: &str = "*";
const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Upstream sources the handlers call. `current` is `None` when no key is
/// configured; `/weather` then answers 500.
#[derive(Debug, Clone)]
pub struct ProxyState {
    pub current: Option<Arc<dyn CurrentWeatherSource>>,
    pub climate: Arc<dyn ClimateSource>,
}

impl ProxyState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = build_http_client().context("Failed to build HTTP client")?;
        let (openweather, nasa) = direct_clients(config, http);

        if openweather.is_none() {
            tracing::warn!("no OpenWeather API key configured; /weather will answer 500");
        }

        Ok(Self {
            current: openweather.map(|c| Arc::new(c) as Arc<dyn CurrentWeatherSource>),
            climate: Arc::new(nasa),
        })
    }
}

pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route(WEATHER_PATH, post(weather).options(preflight))
        .route(CLIMATE_PATH, post(fetch_nasa_power).options(preflight))
        .layer(middleware::map_response(with_cors_headers))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: ProxyState, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    tracing::info!(address = %bind, "proxy listening");
    axum::serve(listener, router(state))
        .await
        .context("Proxy server stopped unexpectedly")
}

async fn with_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    response
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn error_response(status: StatusCode, error: &str, details: Option<String>) -> Response {
    let body = ProxyErrorBody {
        error: error.to_string(),
        details,
    };
    (status, Json(body)).into_response()
}

async fn weather(State(state): State<ProxyState>, body: Bytes) -> Response {
    let request = match serde_json::from_slice::<WeatherProxyRequest>(&body) {
        Ok(r) if !r.lat.is_empty() && !r.lng.is_empty() && !r.date.is_empty() => r,
        _ => return error_response(StatusCode::BAD_REQUEST, "Invalid request body", None),
    };

    let coordinate = match Coordinate::parse(&request.lat, &request.lng) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(lat = %request.lat, lng = %request.lng, error = %e, "rejected coordinates");
            return error_response(StatusCode::BAD_REQUEST, "Invalid coordinates", None);
        }
    };

    let Ok(date) = QueryDate::parse(&request.date) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid request body", None);
    };

    let Some(source) = &state.current else {
        tracing::error!("OpenWeather API key not configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "API key not configured", None);
    };

    match source.current(coordinate, date).await {
        Ok(result) => (StatusCode::OK, Json(WeatherProxyResponse::from(&result))).into_response(),
        Err(e) => {
            tracing::error!(
                status = e.status(),
                lat = coordinate.latitude(),
                lng = coordinate.longitude(),
                %date,
                error = %e,
                "OpenWeather request failed"
            );
            match e {
                FetchError::Auth { .. } | FetchError::RateLimited { .. } => {
                    let status = e
                        .status()
                        .and_then(|s| StatusCode::from_u16(s).ok())
                        .unwrap_or(StatusCode::BAD_GATEWAY);
                    error_response(status, &e.to_string(), None)
                }
                _ => error_response(StatusCode::BAD_GATEWAY, "Upstream weather API error", None),
            }
        }
    }
}

async fn fetch_nasa_power(State(state): State<ProxyState>, body: Bytes) -> Response {
    let failure = |error: &str, details: String| {
        error_response(StatusCode::INTERNAL_SERVER_ERROR, error, Some(details))
    };

    let request = match serde_json::from_slice::<ClimateProxyRequest>(&body) {
        Ok(r) => r,
        Err(e) => return failure("Invalid request body", e.to_string()),
    };

    let coordinate = match Coordinate::new(request.latitude, request.longitude) {
        Ok(c) => c,
        Err(e) => return failure("Invalid coordinates", e.to_string()),
    };

    let date = match QueryDate::parse(&request.date) {
        Ok(d) => d,
        Err(e) => return failure("Invalid date", e.to_string()),
    };

    tracing::info!(lat = request.latitude, lng = request.longitude, date = %request.date, "fetching NASA POWER data");

    match state.climate.daily(coordinate, date).await {
        Ok(result) => (StatusCode::OK, Json(ClimateProxyResponse::from(&result))).into_response(),
        Err(e) => {
            tracing::error!(
                status = e.status(),
                lat = request.latitude,
                lng = request.longitude,
                date = %request.date,
                error = %e,
                "NASA POWER request failed"
            );
            failure(&e.to_string(), format!("{e:?}"))
        }
    }
}
