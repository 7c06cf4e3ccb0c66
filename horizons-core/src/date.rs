use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DateError;

/// Calendar day a query is about, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QueryDate(NaiveDate);

impl QueryDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Accepts `YYYY-MM-DD`, the compact `YYYYMMDD`, or an RFC 3339
    /// timestamp, which is reduced to its UTC calendar day.
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let s = input.trim();
        let err = || DateError {
            input: input.to_string(),
        };

        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(d));
        }
        if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
            return NaiveDate::parse_from_str(s, "%Y%m%d")
                .map(Self)
                .map_err(|_| err());
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc).date_naive()))
            .map_err(|_| err())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `YYYYMMDD`, as NASA POWER expects for `start`/`end`.
    pub fn compact(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// `YYYY-MM-DD`.
    pub fn iso(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl std::fmt::Display for QueryDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.iso())
    }
}

impl From<NaiveDate> for QueryDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

/// Where a requested day sits relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRequest {
    Past(QueryDate),
    Today,
    Future(QueryDate),
}

impl DateRequest {
    /// The climate source is observation-based and has nothing for future days.
    pub fn climate_available(&self) -> bool {
        !matches!(self, DateRequest::Future(_))
    }
}

pub fn classify_date(today: QueryDate, requested: QueryDate) -> DateRequest {
    use std::cmp::Ordering;

    match requested.cmp(&today) {
        Ordering::Less => DateRequest::Past(requested),
        Ordering::Equal => DateRequest::Today,
        Ordering::Greater => DateRequest::Future(requested),
    }
}
