//! Pure formatting of results into labelled cards.

use crate::model::{ClimateOutcome, ClimateResult, CurrentWeatherResult, FetchOutcome, Metric};

pub const ERROR_TEXT: &str = "Error";
pub const UNAVAILABLE_TEXT: &str = "unavailable";
/// Rain that was never reported.
pub const NONE_RECORDED_TEXT: &str = "0";

const CURRENT_DECIMALS: usize = 1;
const CLIMATE_DECIMALS: usize = 1;
const CLIMATE_PRECISE_DECIMALS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Celsius,
    Percent,
    KilometresPerHour,
    Millimetres,
    MillimetresPerDay,
    KilowattHoursPerSquareMetrePerDay,
}

impl Unit {
    /// Text appended to a numeric value, including any separating space.
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Percent => "%",
            Unit::KilometresPerHour => " km/h",
            Unit::Millimetres => " mm",
            Unit::MillimetresPerDay => " mm/day",
            Unit::KilowattHoursPerSquareMetrePerDay => " kWh/m²/day",
        }
    }
}

/// The three things a card can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValue {
    Number(String),
    Unavailable,
    Error,
}

impl CardValue {
    pub fn text(&self) -> &str {
        match self {
            CardValue::Number(s) => s,
            CardValue::Unavailable => UNAVAILABLE_TEXT,
            CardValue::Error => ERROR_TEXT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub value: CardValue,
    pub unit: Unit,
}

impl Card {
    pub fn value_text(&self) -> &str {
        self.value.text()
    }
}

/// Value with unit for numbers; the bare marker otherwise.
impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            CardValue::Number(n) => write!(f, "{n}{}", self.unit.suffix()),
            other => f.write_str(other.text()),
        }
    }
}

pub fn metric_value(metric: Metric, decimals: usize) -> CardValue {
    match metric {
        Metric::Value(v) => CardValue::Number(format!("{v:.decimals$}")),
        Metric::NoneRecorded => CardValue::Number(NONE_RECORDED_TEXT.to_string()),
        Metric::Unavailable => CardValue::Unavailable,
    }
}

/// The four current-weather cards. A failed fetch shows `Error` on each.
pub fn current_cards(outcome: &FetchOutcome<CurrentWeatherResult>) -> Vec<Card> {
    let value = |pick: fn(&CurrentWeatherResult) -> Metric| match outcome {
        FetchOutcome::Success(r) => metric_value(pick(r), CURRENT_DECIMALS),
        FetchOutcome::Failure(_) => CardValue::Error,
    };

    vec![
        Card {
            title: "Temperature",
            subtitle: "Current Reading",
            value: value(|r| r.temperature_c),
            unit: Unit::Celsius,
        },
        Card {
            title: "Humidity",
            subtitle: "Current Level",
            value: value(|r| r.humidity_pct),
            unit: Unit::Percent,
        },
        Card {
            title: "Wind Speed",
            subtitle: "Current Measurement",
            value: value(|r| r.wind_speed_kmh),
            unit: Unit::KilometresPerHour,
        },
        Card {
            title: "Rainfall",
            subtitle: "Last Hour",
            value: value(|r| r.rainfall_mm_1h),
            unit: Unit::Millimetres,
        },
    ]
}

/// The climate cards, or `None` when the fetch was skipped.
pub fn climate_cards(outcome: &ClimateOutcome) -> Option<Vec<Card>> {
    match outcome {
        ClimateOutcome::Skipped { .. } => None,
        ClimateOutcome::Completed(FetchOutcome::Success(r)) => Some(climate_cards_for(Some(r))),
        ClimateOutcome::Completed(FetchOutcome::Failure(_)) => Some(climate_cards_for(None)),
    }
}

fn climate_cards_for(result: Option<&ClimateResult>) -> Vec<Card> {
    let value = |pick: fn(&ClimateResult) -> Metric, decimals: usize| match result {
        Some(r) => metric_value(pick(r), decimals),
        None => CardValue::Error,
    };

    let range = match result {
        Some(r) => temperature_range(r.temperature_min_c, r.temperature_max_c),
        None => CardValue::Error,
    };

    vec![
        Card {
            title: "Average Temperature",
            subtitle: "Daily Mean at 2 m",
            value: value(|r| r.temperature_avg_c, CLIMATE_DECIMALS),
            unit: Unit::Celsius,
        },
        Card {
            title: "Temp Range",
            subtitle: "Daily Min - Max",
            value: range,
            unit: Unit::Celsius,
        },
        Card {
            title: "Precipitation",
            subtitle: "Daily Total",
            value: value(|r| r.precipitation_mm_day, CLIMATE_PRECISE_DECIMALS),
            unit: Unit::MillimetresPerDay,
        },
        Card {
            title: "Humidity",
            subtitle: "Relative at 2 m",
            value: value(|r| r.humidity_pct, CLIMATE_DECIMALS),
            unit: Unit::Percent,
        },
        Card {
            title: "Wind Speed",
            subtitle: "Daily Mean at 10 m",
            value: value(|r| r.wind_speed_kmh, CLIMATE_DECIMALS),
            unit: Unit::KilometresPerHour,
        },
        Card {
            title: "Solar Radiation",
            subtitle: "All-Sky Surface",
            value: value(|r| r.solar_radiation_kwh_m2_day, CLIMATE_PRECISE_DECIMALS),
            unit: Unit::KilowattHoursPerSquareMetrePerDay,
        },
    ]
}

fn temperature_range(min: Metric, max: Metric) -> CardValue {
    match (min, max) {
        (Metric::Value(lo), Metric::Value(hi)) => {
            let d = CLIMATE_DECIMALS;
            CardValue::Number(format!("{lo:.d$} - {hi:.d$}"))
        }
        _ => CardValue::Unavailable,
    }
}
