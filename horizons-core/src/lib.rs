//! Core library for the ClearHorizons dashboard.
//!
//! This crate defines:
//! - The canonical coordinate selection shared by map and form
//! - Current-weather (OpenWeather) and daily-climate (NASA POWER) sources,
//!   direct or through the backend proxy
//! - The orchestrator that runs both lookups with independent outcomes
//! - Dashboard state with last-submission-wins ordering
//! - Card rendering and configuration
//!
//! It is used by `horizons-cli` and `horizons-proxy`.

pub mod config;
pub mod coordinate;
pub mod dashboard;
pub mod date;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod presentation;
pub mod provider;
pub mod selection;

pub use config::Config;
pub use coordinate::Coordinate;
pub use dashboard::{Dashboard, Notification, NotificationLevel, Panels, Submission};
pub use date::QueryDate;
pub use error::{CoordinateError, DateError, FetchError};
pub use model::{ClimateOutcome, ClimateResult, CurrentWeatherResult, FetchOutcome, Metric, Report};
pub use orchestrator::Orchestrator;
pub use provider::{ClimateSource, CurrentWeatherSource, SourceMode, Sources};
pub use selection::Selection;
