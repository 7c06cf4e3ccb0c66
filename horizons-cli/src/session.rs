//! Interactive dashboard.
//!
//! The map capability is reduced to "a click produced this point": the
//! user types where they clicked and it goes through the map path, which
//! wraps and clamps like a panned world map. The form path validates
//! strictly. Both show the same marker and field values afterwards.

use anyhow::Context;
use horizons_core::{Dashboard, FetchError, QueryDate, Submission, dashboard::invalid_input_notification};
use inquire::{InquireError, Select, Text};

use crate::render;

#[derive(Debug, Clone, Copy)]
enum Action {
    ClickMap,
    EnterCoordinates,
    Submit,
    Quit,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Action::ClickMap => "Click on the map",
            Action::EnterCoordinates => "Enter coordinates",
            Action::Submit => "Fetch metrics",
            Action::Quit => "Quit",
        })
    }
}

pub async fn run(dashboard: &Dashboard) -> anyhow::Result<()> {
    let map = dashboard.selection().map_view();
    let form = dashboard.selection().form_view();

    loop {
        match map.marker() {
            Some((lat, lng)) => println!("\nMarker at {lat}, {lng}"),
            None => println!("\nNo location selected yet"),
        }

        let actions = vec![
            Action::ClickMap,
            Action::EnterCoordinates,
            Action::Submit,
            Action::Quit,
        ];
        let action = match Select::new("What next?", actions).prompt() {
            Ok(a) => a,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read menu choice"),
        };

        match action {
            Action::ClickMap => {
                let click = Text::new("Clicked at (lat, lng):").prompt()?;
                match parse_click(&click) {
                    Some((lat, lng)) => {
                        let c = dashboard.selection().select_from_map(lat, lng);
                        tracing::debug!(%c, "map click");
                    }
                    None => println!("A click is two numbers separated by a comma"),
                }
            }
            Action::EnterCoordinates => {
                let (lat_text, lng_text) = form.fields();
                let lat = Text::new("Latitude:").with_initial_value(&lat_text).prompt()?;
                let lng = Text::new("Longitude:").with_initial_value(&lng_text).prompt()?;

                if let Err(e) = dashboard.selection().select_from_form(&lat, &lng) {
                    render::print_notifications(&[invalid_input_notification(&FetchError::from(e))]);
                }
            }
            Action::Submit => submit(dashboard).await?,
            Action::Quit => break,
        }
    }

    Ok(())
}

async fn submit(dashboard: &Dashboard) -> anyhow::Result<()> {
    let today = QueryDate::today();
    let input = Text::new("Date (YYYY-MM-DD):")
        .with_default(&today.iso())
        .prompt()?;

    let date = match QueryDate::parse(&input) {
        Ok(d) => d,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    match dashboard.submit(date).await {
        Ok(Submission::Applied { notifications }) => {
            render::print_notifications(&notifications);
            print!("{}", render::render_panels(&dashboard.panels()));
        }
        Ok(Submission::Superseded) => {}
        Err(e) => render::print_notifications(&[invalid_input_notification(&e)]),
    }

    Ok(())
}

fn parse_click(input: &str) -> Option<(f64, f64)> {
    let (lat, lng) = input.split_once(',')?;
    Some((lat.trim().parse().ok()?, lng.trim().parse().ok()?))
}
