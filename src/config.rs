use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_PREFIX: &str = "CITYWEATHER_";
const DEFAULT_OUTPUT_DIR: &str = "output_data";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration in CITYWEATHER_* environment variables")]
    Env(#[from] envy::Error),

    #[error("Missing API key. Set {0}")]
    MissingApiKey(String),
}

/// Runtime settings, read from `CITYWEATHER_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    /// OpenWeatherMap key (`CITYWEATHER_WEATHER_API_KEY`).
    pub weather_api_key: Option<String>,
    /// Geoapify key (`CITYWEATHER_GEOAPIFY_API_KEY`).
    pub geoapify_api_key: Option<String>,
    /// Where the dataset, plots and maps are written (`CITYWEATHER_OUTPUT_DIR`).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Overrides the system cache directory for the world cities table.
    pub cache_dir: Option<PathBuf>,
    /// A local world cities CSV to use instead of downloading one.
    pub gazetteer_path: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Config>()?)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(vars)?)
    }

    pub fn require_weather_api_key(&self) -> Result<&str, ConfigError> {
        self.weather_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(format!("{ENV_PREFIX}WEATHER_API_KEY")))
    }

    pub fn require_geoapify_api_key(&self) -> Result<&str, ConfigError> {
        self.geoapify_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(format!("{ENV_PREFIX}GEOAPIFY_API_KEY")))
    }

    /// `cities.csv` inside the output directory.
    pub fn dataset_path(&self) -> PathBuf {
        self.output_dir.join("cities.csv")
    }
}
