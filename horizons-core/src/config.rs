use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::SourceMode;

/// Environment variable that overrides the configured OpenWeather key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    pub api_key: Option<String>,
    /// Override for tests or a self-hosted mirror.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NasaPowerConfig {
    pub base_url: Option<String>,
}

/// Where the two proxy endpoints live, e.g. `https://example.com/weather`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub weather_url: Option<String>,
    pub climate_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// mode = "direct"
///
/// [openweather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// "direct" or "proxy".
    pub mode: Option<String>,

    #[serde(default)]
    pub openweather: OpenWeatherConfig,

    #[serde(default)]
    pub nasa_power: NasaPowerConfig,

    #[serde(default)]
    pub proxy: ProxyConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Configured source mode as a strongly-typed value.
    pub fn source_mode(&self) -> Result<SourceMode> {
        let s = self.mode.as_ref().ok_or_else(|| {
            anyhow!(
                "No source mode configured.\n\
                 Hint: run `horizons configure` first, or set {API_KEY_ENV} for direct mode."
            )
        })?;

        SourceMode::try_from(s.as_str())
    }

    /// Like [`Config::source_mode`], but falls back to direct mode when only
    /// the environment supplies a key.
    pub fn effective_source_mode(&self) -> Result<SourceMode> {
        if self.mode.is_none() && std::env::var(API_KEY_ENV).is_ok() {
            return Ok(SourceMode::Direct);
        }
        self.source_mode()
    }

    pub fn set_mode(&mut self, mode: SourceMode) {
        self.mode = Some(mode.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "clearhorizons", "horizons")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Store the OpenWeather key; selects direct mode if no mode was chosen yet.
    pub fn set_openweather_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key.trim().to_string());

        if self.mode.is_none() {
            self.set_mode(SourceMode::Direct);
        }
    }

    /// Store the proxy endpoints; selects proxy mode if no mode was chosen yet.
    pub fn set_proxy_urls(&mut self, weather_url: String, climate_url: String) {
        self.proxy.weather_url = Some(weather_url);
        self.proxy.climate_url = Some(climate_url);

        if self.mode.is_none() {
            self.set_mode(SourceMode::Proxy);
        }
    }

    /// The OpenWeather key, preferring the environment over the file.
    pub fn openweather_api_key(&self) -> Option<String> {
        resolve_api_key(
            std::env::var(API_KEY_ENV).ok(),
            self.openweather.api_key.as_deref(),
        )
    }

    pub fn bind_address(&self) -> &str {
        self.server.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }
}

fn resolve_api_key(from_env: Option<String>, from_file: Option<&str>) -> Option<String> {
    from_env
        .as_deref()
        .or(from_file)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}
