use std::sync::Arc;

use crate::{
    coordinate::Coordinate,
    date::{QueryDate, classify_date},
    error::FetchError,
    model::{ClimateOutcome, FUTURE_DATE_REASON, FetchOutcome, Report},
    provider::{ClimateSource, CurrentWeatherSource, Sources},
};

/// Runs the current-weather and climate lookups for one query.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    current: Arc<dyn CurrentWeatherSource>,
    climate: Arc<dyn ClimateSource>,
}

impl From<Sources> for Orchestrator {
    fn from(sources: Sources) -> Self {
        Self::new(sources.current, sources.climate)
    }
}

impl Orchestrator {
    pub fn new(current: Arc<dyn CurrentWeatherSource>, climate: Arc<dyn ClimateSource>) -> Self {
        Self { current, climate }
    }

    /// Fetch both sources for `date`, judged against today's UTC date.
    pub async fn fetch_all(
        &self,
        coordinate: Coordinate,
        date: QueryDate,
    ) -> Result<Report, FetchError> {
        self.fetch_all_on(coordinate, date, QueryDate::today()).await
    }

    /// Fetch both sources with an explicit "today".
    ///
    /// Only an invalid coordinate fails the call as a whole, and it does so
    /// before any request is made. Source failures are reported per source.
    pub async fn fetch_all_on(
        &self,
        coordinate: Coordinate,
        date: QueryDate,
        today: QueryDate,
    ) -> Result<Report, FetchError> {
        if let Err(e) = coordinate.validate() {
            tracing::warn!(lat = coordinate.latitude(), lng = coordinate.longitude(), %date, error = %e, "rejected query");
            return Err(e.into());
        }

        let lat = coordinate.latitude();
        let lng = coordinate.longitude();
        tracing::info!(lat, lng, %date, "fetching weather and climate");

        let current = async {
            let result = self.current.current(coordinate, date).await;
            if let Err(e) = &result {
                tracing::error!(
                    source = self.current.name(),
                    status = e.status(),
                    lat,
                    lng,
                    %date,
                    error = %e,
                    "current weather fetch failed"
                );
            }
            FetchOutcome::from(result)
        };

        let climate = async {
            if !classify_date(today, date).climate_available() {
                tracing::info!(lat, lng, %date, %today, "skipping climate fetch for future date");
                return ClimateOutcome::Skipped {
                    reason: FUTURE_DATE_REASON.to_string(),
                };
            }

            let result = self.climate.daily(coordinate, date).await;
            if let Err(e) = &result {
                tracing::error!(
                    source = self.climate.name(),
                    status = e.status(),
                    lat,
                    lng,
                    date = %date.compact(),
                    error = %e,
                    "climate fetch failed"
                );
            }
            ClimateOutcome::Completed(FetchOutcome::from(result))
        };

        let (current, climate) = tokio::join!(current, climate);
        Ok(Report { current, climate })
    }
}
