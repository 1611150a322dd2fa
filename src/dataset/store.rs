use crate::dataset::error::DatasetError;
use crate::types::city_record::CityRecord;
use log::{info, warn};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::{fs, task};

/// Synthetic row index written as the first column.
pub const INDEX_COLUMN: &str = "City_ID";

pub const COL_CITY: &str = "City";
pub const COL_LAT: &str = "Lat";
pub const COL_LNG: &str = "Lng";
pub const COL_MAX_TEMP: &str = "Max Temp";
pub const COL_HUMIDITY: &str = "Humidity";
pub const COL_CLOUDINESS: &str = "Cloudiness";
pub const COL_WIND_SPEED: &str = "Wind Speed";
pub const COL_COUNTRY: &str = "Country";
pub const COL_DATE: &str = "Date";

/// Record columns in file order, after the index.
pub const RECORD_COLUMNS: [&str; 9] = [
    COL_CITY,
    COL_LAT,
    COL_LNG,
    COL_MAX_TEMP,
    COL_HUMIDITY,
    COL_CLOUDINESS,
    COL_WIND_SPEED,
    COL_COUNTRY,
    COL_DATE,
];

/// Column types of the stored table, so a header-only file reads back with the
/// same dtypes as a populated one.
pub fn dataset_schema() -> Schema {
    let mut schema = Schema::with_capacity(RECORD_COLUMNS.len() + 1);
    for (name, dtype) in [
        (INDEX_COLUMN, DataType::Int64),
        (COL_CITY, DataType::String),
        (COL_LAT, DataType::Float64),
        (COL_LNG, DataType::Float64),
        (COL_MAX_TEMP, DataType::Float64),
        (COL_HUMIDITY, DataType::Int64),
        (COL_CLOUDINESS, DataType::Int64),
        (COL_WIND_SPEED, DataType::Float64),
        (COL_COUNTRY, DataType::String),
        (COL_DATE, DataType::Int64),
    ] {
        schema.with_column(name.into(), dtype);
    }
    schema
}

/// The weather table on disk, a comma-separated file with a header row.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `records` with a `City_ID` index, replacing any previous file.
    ///
    /// The table goes to a temporary file next to the target which is then renamed
    /// over it, so a reader never sees a half-written dataset.
    pub async fn save(&self, records: &[CityRecord]) -> Result<(), DatasetError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| DatasetError::DirCreation(dir.clone(), e))?;

        let mut df = records_to_dataframe(records)?;
        let path = self.path.clone();
        task::spawn_blocking(move || {
            let mut temp_file = NamedTempFile::new_in(&dir)
                .map_err(|e| DatasetError::WriteIo(path.clone(), e))?;
            CsvWriter::new(temp_file.as_file_mut())
                .include_header(true)
                .finish(&mut df)
                .map_err(|e| DatasetError::WritePolars(path.clone(), e))?;
            temp_file
                .persist(&path)
                .map_err(|e| DatasetError::WriteIo(path.clone(), e.error))?;
            Ok::<(), DatasetError>(())
        })
        .await??;

        info!("Wrote {} cities to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Reads the whole file into a DataFrame, index column included.
    pub async fn load_frame(&self) -> Result<DataFrame, DatasetError> {
        if fs::metadata(&self.path).await.is_err() {
            return Err(DatasetError::NotFound(self.path.clone()));
        }
        let path = self.path.clone();
        let df = task::spawn_blocking(move || {
            CsvReadOptions::default()
                .with_has_header(true)
                .with_schema_overwrite(Some(Arc::new(dataset_schema())))
                .try_into_reader_with_file_path(Some(path.clone()))
                .and_then(|reader| reader.finish())
                .map_err(|e| DatasetError::ReadPolars(path, e))
        })
        .await??;
        info!("Loaded {} rows from {}", df.height(), self.path.display());
        Ok(df)
    }

    /// Reads the file back into records. Rows with a missing value are dropped.
    pub async fn load(&self) -> Result<Vec<CityRecord>, DatasetError> {
        let df = self.load_frame().await?;
        dataframe_to_records(&df)
    }
}

/// Builds the table written to disk: `City_ID` followed by the record columns.
pub fn records_to_dataframe(records: &[CityRecord]) -> Result<DataFrame, DatasetError> {
    let df = df!(
        INDEX_COLUMN => (0..records.len() as i64).collect::<Vec<_>>(),
        COL_CITY => records.iter().map(|r| r.city.as_str()).collect::<Vec<_>>(),
        COL_LAT => records.iter().map(|r| r.lat).collect::<Vec<_>>(),
        COL_LNG => records.iter().map(|r| r.lng).collect::<Vec<_>>(),
        COL_MAX_TEMP => records.iter().map(|r| r.max_temp).collect::<Vec<_>>(),
        COL_HUMIDITY => records.iter().map(|r| r.humidity).collect::<Vec<_>>(),
        COL_CLOUDINESS => records.iter().map(|r| r.cloudiness).collect::<Vec<_>>(),
        COL_WIND_SPEED => records.iter().map(|r| r.wind_speed).collect::<Vec<_>>(),
        COL_COUNTRY => records.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(),
        COL_DATE => records.iter().map(|r| r.date).collect::<Vec<_>>(),
    )?;
    Ok(df)
}

/// Reads records out of a weather table. Extra columns such as the index are ignored.
///
/// Numeric columns are cast, so a temperature column that happened to hold only
/// whole numbers still reads as `f64`.
pub fn dataframe_to_records(df: &DataFrame) -> Result<Vec<CityRecord>, DatasetError> {
    for name in RECORD_COLUMNS {
        df.column(name)
            .map_err(|e| DatasetError::ColumnNotFound(name.to_string(), e))?;
    }
    let complete = df.select(RECORD_COLUMNS)?.drop_nulls::<String>(None)?;
    let dropped = df.height() - complete.height();
    if dropped > 0 {
        warn!("Dropped {} rows with missing values", dropped);
    }

    let cities = string_column(&complete, COL_CITY)?;
    let lats = float_column(&complete, COL_LAT)?;
    let lngs = float_column(&complete, COL_LNG)?;
    let max_temps = float_column(&complete, COL_MAX_TEMP)?;
    let humidities = int_column(&complete, COL_HUMIDITY)?;
    let cloudiness = int_column(&complete, COL_CLOUDINESS)?;
    let wind_speeds = float_column(&complete, COL_WIND_SPEED)?;
    let countries = string_column(&complete, COL_COUNTRY)?;
    let dates = int_column(&complete, COL_DATE)?;

    Ok((0..complete.height())
        .map(|i| CityRecord {
            city: cities[i].clone(),
            lat: lats[i],
            lng: lngs[i],
            max_temp: max_temps[i],
            humidity: humidities[i],
            cloudiness: cloudiness[i],
            wind_speed: wind_speeds[i],
            country: countries[i].clone(),
            date: dates[i],
        })
        .collect())
}

fn typed_column(
    df: &DataFrame,
    name: &str,
    dtype: &DataType,
    expected: &'static str,
) -> Result<Column, DatasetError> {
    df.column(name)
        .map_err(|e| DatasetError::ColumnNotFound(name.to_string(), e))?
        .cast(dtype)
        .map_err(|e| DatasetError::ColumnType {
            column: name.to_string(),
            expected,
            source: e,
        })
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>, DatasetError> {
    let column = typed_column(df, name, &DataType::String, "text")?;
    let values = column.str().map_err(|e| DatasetError::ColumnType {
        column: name.to_string(),
        expected: "text",
        source: e,
    })?;
    Ok(values
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect())
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>, DatasetError> {
    let column = typed_column(df, name, &DataType::Float64, "f64")?;
    let values = column.f64().map_err(|e| DatasetError::ColumnType {
        column: name.to_string(),
        expected: "f64",
        source: e,
    })?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

fn int_column(df: &DataFrame, name: &str) -> Result<Vec<i64>, DatasetError> {
    let column = typed_column(df, name, &DataType::Int64, "i64")?;
    let values = column.i64().map_err(|e| DatasetError::ColumnType {
        column: name.to_string(),
        expected: "i64",
        source: e,
    })?;
    Ok(values.into_iter().map(|v| v.unwrap_or_default()).collect())
}
