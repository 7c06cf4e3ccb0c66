use thiserror::Error;

/// Why a typed coordinate was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("no coordinate selected")]
    NoSelection,

    #[error("{field} '{input}' is not a number")]
    NotANumber { field: Axis, input: String },

    #[error("{field} must be a finite number")]
    NotFinite { field: Axis },

    #[error("{field} {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: Axis,
        value: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid date '{input}'. Expected YYYY-MM-DD, YYYYMMDD or an RFC 3339 timestamp")]
pub struct DateError {
    pub input: String,
}

/// Failure of one remote source, or of the input that would have been sent to it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Invalid coordinates: {0}")]
    InvalidInput(#[from] CoordinateError),

    #[error("Invalid {source_name} API key")]
    Auth { source_name: &'static str },

    #[error("{source_name} rate limit exceeded. Please try again later.")]
    RateLimited { source_name: &'static str },

    #[error("{source_name} request failed with status {status}{}", message_suffix(.message))]
    Upstream {
        source_name: &'static str,
        status: u16,
        message: Option<String>,
    },

    #[error("Could not reach {source_name}: {reason}")]
    Network {
        source_name: &'static str,
        reason: String,
    },

    #[error("Unexpected {source_name} response: {reason}")]
    Malformed {
        source_name: &'static str,
        reason: String,
    },
}

impl FetchError {
    /// HTTP status carried by the error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Auth { .. } => Some(401),
            FetchError::RateLimited { .. } => Some(429),
            FetchError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(": {m}"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_message_names_the_key() {
        let err = FetchError::Auth {
            source_name: "OpenWeather",
        };
        assert_eq!(err.to_string(), "Invalid OpenWeather API key");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn upstream_message_includes_body_when_present() {
        let with = FetchError::Upstream {
            source_name: "NASA POWER",
            status: 503,
            message: Some("maintenance".into()),
        };
        let without = FetchError::Upstream {
            source_name: "NASA POWER",
            status: 503,
            message: None,
        };

        assert_eq!(
            with.to_string(),
            "NASA POWER request failed with status 503: maintenance"
        );
        assert_eq!(
            without.to_string(),
            "NASA POWER request failed with status 503"
        );
    }

    #[test]
    fn network_error_has_no_status() {
        let err = FetchError::Network {
            source_name: "OpenWeather",
            reason: "connection refused".into(),
        };
        assert_eq!(err.status(), None);
    }
}
