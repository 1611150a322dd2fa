use crate::dataset::error::DatasetError;
use crate::dataset::store::{dataframe_to_records, COL_CLOUDINESS, COL_MAX_TEMP, COL_WIND_SPEED};
use crate::types::city_record::{CityRecord, FilteredCityRecord};
use bon::bon;
use log::info;
use polars::prelude::{col, lit, DataFrame, IntoLazy, LazyFrame};

const DEFAULT_MIN_MAX_TEMP: f64 = 21.0;
const DEFAULT_MAX_MAX_TEMP: f64 = 27.0;
const DEFAULT_MAX_WIND_SPEED: f64 = 4.5;
const DEFAULT_CLOUDINESS: i64 = 0;

/// The weather a traveller is looking for.
///
/// A city matches when its maximum temperature lies strictly between the two bounds,
/// its wind is strictly below the limit and its cloud cover equals the wanted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherPreference {
    pub min_max_temp: f64,
    pub max_max_temp: f64,
    pub max_wind_speed: f64,
    pub cloudiness: i64,
}

#[bon]
impl WeatherPreference {
    /// Creates a preference.
    ///
    /// * `.min_max_temp(f64)`: Optional. Exclusive lower bound on `Max Temp`. Defaults to `21`.
    /// * `.max_max_temp(f64)`: Optional. Exclusive upper bound on `Max Temp`. Defaults to `27`.
    /// * `.max_wind_speed(f64)`: Optional. Exclusive upper bound on `Wind Speed`. Defaults to `4.5`.
    /// * `.cloudiness(i64)`: Optional. Required `Cloudiness`. Defaults to `0`.
    #[builder]
    pub fn new(
        min_max_temp: Option<f64>,
        max_max_temp: Option<f64>,
        max_wind_speed: Option<f64>,
        cloudiness: Option<i64>,
    ) -> Self {
        Self {
            min_max_temp: min_max_temp.unwrap_or(DEFAULT_MIN_MAX_TEMP),
            max_max_temp: max_max_temp.unwrap_or(DEFAULT_MAX_MAX_TEMP),
            max_wind_speed: max_wind_speed.unwrap_or(DEFAULT_MAX_WIND_SPEED),
            cloudiness: cloudiness.unwrap_or(DEFAULT_CLOUDINESS),
        }
    }
}

impl Default for WeatherPreference {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WeatherPreference {
    pub fn matches(&self, record: &CityRecord) -> bool {
        record.max_temp > self.min_max_temp
            && record.max_temp < self.max_max_temp
            && record.wind_speed < self.max_wind_speed
            && record.cloudiness == self.cloudiness
    }
}

pub trait CityFrameFilterExt {
    /// Keeps the rows of a weather table that match `preference`.
    ///
    /// Rows keep their relative order. A null in a compared column never matches.
    fn filter_preference(self, preference: &WeatherPreference) -> LazyFrame;
}

impl CityFrameFilterExt for LazyFrame {
    fn filter_preference(self, preference: &WeatherPreference) -> LazyFrame {
        self.filter(
            col(COL_MAX_TEMP)
                .gt(lit(preference.min_max_temp))
                .and(col(COL_MAX_TEMP).lt(lit(preference.max_max_temp)))
                .and(col(COL_WIND_SPEED).lt(lit(preference.max_wind_speed)))
                .and(col(COL_CLOUDINESS).eq(lit(preference.cloudiness))),
        )
    }
}

/// Filters a weather table by `preference`, then drops every row that still has a
/// missing value in any column.
pub fn apply_preference(
    df: DataFrame,
    preference: &WeatherPreference,
) -> Result<DataFrame, DatasetError> {
    let before = df.height();
    let filtered = df
        .lazy()
        .filter_preference(preference)
        .collect()?
        .drop_nulls::<String>(None)?;
    info!(
        "{} of {} cities match the weather preference",
        filtered.height(),
        before
    );
    Ok(filtered)
}

/// Projects a filtered weather table into rows waiting for a hotel.
pub fn filtered_city_records(df: &DataFrame) -> Result<Vec<FilteredCityRecord>, DatasetError> {
    Ok(dataframe_to_records(df)?
        .iter()
        .map(FilteredCityRecord::from)
        .collect())
}
