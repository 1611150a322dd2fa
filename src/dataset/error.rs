use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to create dataset directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing dataset '{0}'")]
    WriteIo(PathBuf, #[source] std::io::Error),
    #[error("Encoding error writing dataset '{0}'")]
    WritePolars(PathBuf, #[source] PolarsError),

    #[error("Dataset '{0}' does not exist")]
    NotFound(PathBuf),
    #[error("Failed to read dataset '{0}'")]
    ReadPolars(PathBuf, #[source] PolarsError),

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Column '{column}' could not be read as {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        #[source]
        source: PolarsError,
    },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
