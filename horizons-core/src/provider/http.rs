use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};

use crate::error::FetchError;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("clearhorizons/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for every source.
pub fn build_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
}

/// Send a request and hand back the body of a 2xx response.
///
/// Non-2xx statuses and transport failures are converted into the
/// matching `FetchError` here so no source has to repeat the mapping.
pub(crate) async fn send(
    source_name: &'static str,
    request: RequestBuilder,
) -> Result<String, FetchError> {
    let response = request.send().await.map_err(|e| FetchError::Network {
        source_name,
        reason: e.to_string(),
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| FetchError::Network {
        source_name,
        reason: format!("failed to read response body: {e}"),
    })?;

    if !status.is_success() {
        tracing::debug!(source = source_name, status = status.as_u16(), body = %truncate_body(&body), "non-success response");
        return Err(error_for_status(source_name, status, &body));
    }

    Ok(body)
}

pub(crate) fn error_for_status(
    source_name: &'static str,
    status: StatusCode,
    body: &str,
) -> FetchError {
    match status {
        StatusCode::UNAUTHORIZED => FetchError::Auth { source_name },
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited { source_name },
        _ => FetchError::Upstream {
            source_name,
            status: status.as_u16(),
            message: error_message(body),
        },
    }
}

/// Pull a human-readable message out of an error body.
///
/// OpenWeather uses `message`, the proxies use `error`, NASA POWER uses
/// `messages` or `detail`. Anything else is passed through truncated.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["error", "message", "detail"] {
            if let Some(s) = value.get(key).and_then(|v| v.as_str()) {
                return Some(s.to_string());
            }
        }
        if let Some(first) = value
            .get("messages")
            .and_then(|v| v.as_array())
            .and_then(|a| a.first())
            .and_then(|v| v.as_str())
        {
            return Some(first.to_string());
        }
    }

    Some(truncate_body(trimmed))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            error_for_status("OpenWeather", StatusCode::UNAUTHORIZED, ""),
            FetchError::Auth {
                source_name: "OpenWeather"
            }
        );
        assert_eq!(
            error_for_status("OpenWeather", StatusCode::TOO_MANY_REQUESTS, ""),
            FetchError::RateLimited {
                source_name: "OpenWeather"
            }
        );
        assert_eq!(
            error_for_status("OpenWeather", StatusCode::BAD_GATEWAY, ""),
            FetchError::Upstream {
                source_name: "OpenWeather",
                status: 502,
                message: None,
            }
        );
    }

    #[test]
    fn message_from_known_body_shapes() {
        assert_eq!(
            error_message(r#"{"cod":"404","message":"city not found"}"#).as_deref(),
            Some("city not found")
        );
        assert_eq!(
            error_message(r#"{"error":"Upstream weather API error"}"#).as_deref(),
            Some("Upstream weather API error")
        );
        assert_eq!(
            error_message(r#"{"messages":["Start date is after end date"]}"#).as_deref(),
            Some("Start date is after end date")
        );
        assert_eq!(error_message("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message("  "), None);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(
            join_url("http://localhost:1234/", "/data/2.5/weather"),
            "http://localhost:1234/data/2.5/weather"
        );
    }
}
