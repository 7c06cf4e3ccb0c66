use tokio::sync::watch;

use crate::{coordinate::Coordinate, error::CoordinateError};

/// The canonical coordinate selection shared by the map and the form.
///
/// There is exactly one writer path per input surface and both surfaces
/// read through [`MapView`] and [`FormView`], which observe the same
/// channel. Nothing keeps a private copy.
#[derive(Debug)]
pub struct Selection {
    tx: watch::Sender<Option<Coordinate>>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn current(&self) -> Option<Coordinate> {
        *self.tx.borrow()
    }

    /// A click on the map. Always succeeds.
    pub fn select_from_map(&self, latitude: f64, longitude: f64) -> Coordinate {
        let coordinate = Coordinate::from_map_click(latitude, longitude);
        self.set(coordinate);
        coordinate
    }

    /// A submission of the manual form. On error the selection is untouched.
    pub fn select_from_form(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<Coordinate, CoordinateError> {
        let coordinate = Coordinate::parse(latitude, longitude)?;
        self.set(coordinate);
        Ok(coordinate)
    }

    fn set(&self, coordinate: Coordinate) {
        tracing::debug!(lat = coordinate.latitude(), lng = coordinate.longitude(), "selection changed");
        self.tx.send_replace(Some(coordinate));
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Coordinate>> {
        self.tx.subscribe()
    }

    pub fn map_view(&self) -> MapView {
        MapView { rx: self.subscribe() }
    }

    pub fn form_view(&self) -> FormView {
        FormView { rx: self.subscribe() }
    }
}

/// What the map capability renders: a marker at the selection, if any.
#[derive(Debug, Clone)]
pub struct MapView {
    rx: watch::Receiver<Option<Coordinate>>,
}

impl MapView {
    pub fn marker(&self) -> Option<(f64, f64)> {
        self.rx
            .borrow()
            .map(|c| (c.latitude(), c.longitude()))
    }

    /// Resolves when the selection moves; `false` once the selection is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// What the form shows in its two text inputs.
#[derive(Debug, Clone)]
pub struct FormView {
    rx: watch::Receiver<Option<Coordinate>>,
}

impl FormView {
    /// `(latitude, longitude)` text; empty before anything is selected.
    pub fn fields(&self) -> (String, String) {
        match *self.rx.borrow() {
            Some(c) => c.to_form_text(),
            None => (String::new(), String::new()),
        }
    }

    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
