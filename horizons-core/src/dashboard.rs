use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    coordinate::Coordinate,
    date::QueryDate,
    error::{CoordinateError, FetchError},
    model::{ClimateOutcome, CurrentWeatherResult, FetchOutcome, Report},
    orchestrator::Orchestrator,
    presentation::{self, Card},
    selection::Selection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn new(level: NotificationLevel, title: &str, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            description: description.into(),
        }
    }
}

/// The live results. Each source has its own slot.
#[derive(Debug, Clone, Default)]
pub struct Panels {
    pub query: Option<(Coordinate, QueryDate)>,
    pub current: Option<FetchOutcome<CurrentWeatherResult>>,
    pub climate: Option<ClimateOutcome>,
}

impl Panels {
    pub fn current_cards(&self) -> Option<Vec<Card>> {
        self.current.as_ref().map(presentation::current_cards)
    }

    /// `None` before any query and when the last climate fetch was skipped.
    pub fn climate_cards(&self) -> Option<Vec<Card>> {
        self.climate.as_ref().and_then(presentation::climate_cards)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Results were committed to the panels.
    Applied { notifications: Vec<Notification> },
    /// A newer submission started while this one was in flight; its
    /// results were dropped.
    Superseded,
}

/// Selection, result slots and submission ordering for one user session.
#[derive(Debug)]
pub struct Dashboard {
    selection: Selection,
    orchestrator: Orchestrator,
    latest: AtomicU64,
    panels: Mutex<Panels>,
}

impl Dashboard {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            selection: Selection::new(),
            orchestrator,
            latest: AtomicU64::new(0),
            panels: Mutex::new(Panels::default()),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn panels(&self) -> Panels {
        self.lock_panels().clone()
    }

    pub async fn submit(&self, date: QueryDate) -> Result<Submission, FetchError> {
        self.submit_on(date, QueryDate::today()).await
    }

    /// Fetch for the current selection and commit the results, unless a
    /// later submission has started in the meantime.
    ///
    /// An invalid or missing selection fails without touching the panels.
    pub async fn submit_on(
        &self,
        date: QueryDate,
        today: QueryDate,
    ) -> Result<Submission, FetchError> {
        let coordinate = self
            .selection
            .current()
            .ok_or(FetchError::InvalidInput(CoordinateError::NoSelection))?;
        coordinate.validate()?;

        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let report = self.orchestrator.fetch_all_on(coordinate, date, today).await?;

        let mut panels = self.lock_panels();
        if self.latest.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, %date, "dropping results of superseded submission");
            return Ok(Submission::Superseded);
        }

        let notifications = notifications_for(&report, date);
        panels.query = Some((coordinate, date));
        panels.current = Some(report.current);
        panels.climate = Some(report.climate);

        Ok(Submission::Applied { notifications })
    }

    fn lock_panels(&self) -> std::sync::MutexGuard<'_, Panels> {
        self.panels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Notification for a submission that never reached the network.
pub fn invalid_input_notification(error: &FetchError) -> Notification {
    Notification::new(NotificationLevel::Error, "Invalid coordinates", error.to_string())
}

pub fn notifications_for(report: &Report, date: QueryDate) -> Vec<Notification> {
    let mut out = Vec::with_capacity(2);

    match &report.current {
        FetchOutcome::Success(_) => out.push(Notification::new(
            NotificationLevel::Success,
            "Weather data fetched",
            format!("Fetched metrics for {date}"),
        )),
        FetchOutcome::Failure(e) => out.push(Notification::new(
            NotificationLevel::Error,
            "Failed to fetch weather data",
            e.to_string(),
        )),
    }

    match &report.climate {
        ClimateOutcome::Skipped { reason } => out.push(Notification::new(
            NotificationLevel::Info,
            "Climate data unavailable",
            reason.clone(),
        )),
        ClimateOutcome::Completed(FetchOutcome::Failure(e)) => out.push(Notification::new(
            NotificationLevel::Error,
            "Failed to fetch climate data",
            e.to_string(),
        )),
        ClimateOutcome::Completed(FetchOutcome::Success(_)) => {}
    }

    out
}
