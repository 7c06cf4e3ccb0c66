//! Standalone binary serving the two proxy endpoints.

use anyhow::Context;
use horizons_core::Config;
use horizons_proxy::ProxyState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Overrides `server.bind` from the config file.
const BIND_ENV: &str = "HORIZONS_BIND";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "horizons_proxy=info,horizons_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    let bind = std::env::var(BIND_ENV).unwrap_or_else(|_| config.bind_address().to_string());

    let state = ProxyState::from_config(&config)?;
    horizons_proxy::serve(state, &bind).await
}
