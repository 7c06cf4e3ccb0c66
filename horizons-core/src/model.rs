use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// One reading as reported by a source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Metric {
    Value(f64),
    /// The source omits the field when nothing happened (rain); counts as zero.
    NoneRecorded,
    /// The source should have reported it and did not.
    Unavailable,
}

impl Metric {
    /// Missing becomes `Unavailable`.
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Metric::Value(v),
            _ => Metric::Unavailable,
        }
    }

    /// Missing becomes `NoneRecorded`.
    pub fn or_none_recorded(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Metric::Value(v),
            Some(_) => Metric::Unavailable,
            None => Metric::NoneRecorded,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::NoneRecorded => Some(0.0),
            Metric::Unavailable => None,
        }
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Metric::Value(v) => Metric::Value(f(v)),
            other => other,
        }
    }
}

/// Present-moment conditions at a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeatherResult {
    pub temperature_c: Metric,
    pub humidity_pct: Metric,
    pub wind_speed_kmh: Metric,
    pub rainfall_mm_1h: Metric,
}

/// Satellite-derived daily aggregates for one day at a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateResult {
    pub temperature_avg_c: Metric,
    pub temperature_max_c: Metric,
    pub temperature_min_c: Metric,
    pub precipitation_mm_day: Metric,
    pub humidity_pct: Metric,
    pub wind_speed_kmh: Metric,
    pub solar_radiation_kwh_m2_day: Metric,
    /// Grid cell centre the source resolved the request to.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Success(T),
    Failure(FetchError),
}

impl<T> FetchOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            FetchOutcome::Success(v) => Some(v),
            FetchOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchError> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::Failure(e) => Some(e),
        }
    }
}

impl<T> From<Result<T, FetchError>> for FetchOutcome<T> {
    fn from(value: Result<T, FetchError>) -> Self {
        match value {
            Ok(v) => FetchOutcome::Success(v),
            Err(e) => FetchOutcome::Failure(e),
        }
    }
}

pub const FUTURE_DATE_REASON: &str = "future date not supported";

#[derive(Debug, Clone, PartialEq)]
pub enum ClimateOutcome {
    Completed(FetchOutcome<ClimateResult>),
    Skipped { reason: String },
}

impl ClimateOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ClimateOutcome::Skipped { .. })
    }
}

/// Both source outcomes of one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub current: FetchOutcome<CurrentWeatherResult>,
    pub climate: ClimateOutcome,
}
