use serde::{Deserialize, Serialize};

use crate::error::{Axis, CoordinateError};

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A validated point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        check_axis(Axis::Latitude, latitude, LATITUDE_RANGE)?;
        check_axis(Axis::Longitude, longitude, LONGITUDE_RANGE)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse the two text fields of the coordinate form.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, CoordinateError> {
        let lat = parse_axis(Axis::Latitude, latitude)?;
        let lng = parse_axis(Axis::Longitude, longitude)?;
        Self::new(lat, lng)
    }

    /// Normalize a map click.
    ///
    /// A world map that has been panned past the antimeridian reports
    /// longitudes outside [-180, 180]; those are wrapped back. Latitude is
    /// clamped to the poles.
    pub fn from_map_click(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(LATITUDE_RANGE.0, LATITUDE_RANGE.1),
            longitude: wrap_longitude(longitude),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Re-check the invariants. Map clicks are trusted rather than
    /// validated, so the orchestrator calls this before any request.
    pub fn validate(&self) -> Result<(), CoordinateError> {
        Self::new(self.latitude, self.longitude).map(|_| ())
    }

    /// Text for the form fields, in the shortest form that parses back to
    /// the same value.
    pub fn to_form_text(&self) -> (String, String) {
        (self.latitude.to_string(), self.longitude.to_string())
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

fn parse_axis(field: Axis, input: &str) -> Result<f64, CoordinateError> {
    let trimmed = input.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| CoordinateError::NotANumber {
            field,
            input: trimmed.to_string(),
        })
}

fn check_axis(field: Axis, value: f64, (min, max): (f64, f64)) -> Result<(), CoordinateError> {
    if !value.is_finite() {
        return Err(CoordinateError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(CoordinateError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn wrap_longitude(lng: f64) -> f64 {
    if (LONGITUDE_RANGE.0..=LONGITUDE_RANGE.1).contains(&lng) {
        return lng;
    }
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps +180 onto -180; keep the sign the user panned towards.
    if wrapped == -180.0 && lng > 0.0 {
        180.0
    } else {
        wrapped
    }
}
