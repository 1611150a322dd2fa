use crate::analysis::error::AnalysisError;
use crate::config::ConfigError;
use crate::dataset::error::DatasetError;
use crate::gazetteer::error::GazetteerError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CityWeatherError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Gazetteer(#[from] GazetteerError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Failed to create directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Path exists but is not a directory: '{0}'")]
    NotADirectory(PathBuf),

    #[error("Failed to determine cache directory")]
    CacheDirResolution,

    #[error("Failed to encode map")]
    MapEncode(#[source] serde_json::Error),

    #[error("Failed to write map '{0}'")]
    MapWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),
}
