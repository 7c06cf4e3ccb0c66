use anyhow::Context;
use clap::{Parser, Subcommand};
use horizons_core::{
    Config, Dashboard, FetchError, Orchestrator, QueryDate, SourceMode, Submission,
    dashboard::invalid_input_notification, provider::sources_from_config,
};
use inquire::{Password, Select, Text};

use crate::{render, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "horizons",
    version,
    about = "Current weather and NASA POWER climate metrics for any coordinate"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose direct or proxy mode and store the API key or proxy URLs.
    Configure,

    /// Show metrics for one coordinate.
    Show {
        /// Latitude in decimal degrees, e.g. "40.7128".
        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        /// Longitude in decimal degrees, e.g. "-74.0060".
        #[arg(long, allow_hyphen_values = true)]
        lng: String,

        /// Day to query (YYYY-MM-DD or YYYYMMDD); today (UTC) if absent.
        #[arg(long)]
        date: Option<String>,
    },

    /// Interactive session: click the map or type coordinates, then submit.
    Dashboard,

    /// Serve the `/weather` and `/fetch-nasa-power` proxy endpoints.
    Serve {
        /// Address to bind, e.g. "0.0.0.0:8787". Defaults to the config value.
        #[arg(long)]
        bind: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lng, date } => show(&lat, &lng, date.as_deref()).await,
            Command::Dashboard => {
                let dashboard = dashboard_from_config()?;
                session::run(&dashboard).await
            }
            Command::Serve { bind } => {
                let config = Config::load()?;
                let bind = bind.unwrap_or_else(|| config.bind_address().to_string());
                let state = horizons_proxy::ProxyState::from_config(&config)?;
                horizons_proxy::serve(state, &bind).await
            }
        }
    }
}

fn dashboard_from_config() -> anyhow::Result<Dashboard> {
    let config = Config::load()?;
    let sources = sources_from_config(&config)?;
    Ok(Dashboard::new(Orchestrator::from(sources)))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let modes: Vec<SourceMode> = SourceMode::all().to_vec();
    let mode = Select::new("How should the dashboard reach its data?", modes)
        .with_help_message("direct: this machine holds the OpenWeather key; proxy: a server does")
        .prompt()
        .context("Configuration cancelled")?;

    match mode {
        SourceMode::Direct => {
            let key = Password::new("OpenWeather API key:")
                .without_confirmation()
                .prompt()
                .context("Configuration cancelled")?;
            config.set_openweather_api_key(key);
        }
        SourceMode::Proxy => {
            let weather_url = Text::new("Current-weather proxy URL:")
                .with_default(
                    config
                        .proxy
                        .weather_url
                        .as_deref()
                        .unwrap_or("http://127.0.0.1:8787/weather"),
                )
                .prompt()
                .context("Configuration cancelled")?;
            let climate_url = Text::new("Climate proxy URL:")
                .with_default(
                    config
                        .proxy
                        .climate_url
                        .as_deref()
                        .unwrap_or("http://127.0.0.1:8787/fetch-nasa-power"),
                )
                .prompt()
                .context("Configuration cancelled")?;
            config.set_proxy_urls(weather_url, climate_url);
        }
    }
    config.set_mode(mode);

    config.save()?;
    println!(
        "Saved {} mode to {}",
        mode,
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn show(lat: &str, lng: &str, date: Option<&str>) -> anyhow::Result<()> {
    let dashboard = dashboard_from_config()?;

    if let Err(e) = dashboard.selection().select_from_form(lat, lng) {
        let err = FetchError::from(e);
        render::print_notifications(&[invalid_input_notification(&err)]);
        return Err(err.into());
    }

    let date = match date {
        Some(d) => QueryDate::parse(d)?,
        None => QueryDate::today(),
    };

    match dashboard.submit(date).await? {
        Submission::Applied { notifications } => {
            render::print_notifications(&notifications);
            print!("{}", render::render_panels(&dashboard.panels()));
        }
        Submission::Superseded => {}
    }

    Ok(())
}
