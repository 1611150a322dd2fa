//! HTML scatter plots of the weather table, rendered with plotlars.

use crate::analysis::HemisphereRegression;
use crate::error::CityWeatherError;
use crate::types::city_record::CityRecord;
use crate::types::weather_variable::WeatherVariable;
use chrono::NaiveDate;
use log::info;
use plotlars::{Plot, ScatterPlot};
use polars::prelude::*;
use std::path::{Path, PathBuf};

const LATITUDE_LABEL: &str = "Latitude";
const SERIES_COLUMN: &str = "Series";

/// Writes `<FigN>.html`: every city's `variable` against its latitude.
pub fn write_latitude_scatter(
    records: &[CityRecord],
    variable: WeatherVariable,
    date: Option<NaiveDate>,
    output_dir: &Path,
) -> Result<PathBuf, CityWeatherError> {
    let df = df!(
        "Lat" => records.iter().map(|r| r.lat).collect::<Vec<_>>(),
        variable.column() => records.iter().map(|r| variable.value(r)).collect::<Vec<_>>(),
    )?;

    let path = output_dir.join(format!("{}.html", variable.figure_stem()));
    ScatterPlot::builder()
        .data(&df)
        .x("Lat")
        .y(variable.column())
        .plot_title(variable.scatter_title(date).as_str())
        .x_title(LATITUDE_LABEL)
        .y_title(variable.axis_label())
        .build()
        .write_html(path.to_string_lossy().to_string());
    info!("Wrote {}", path.display());
    Ok(path)
}

/// Writes one regression plot: the hemisphere's cities plus the fitted line,
/// titled with the equation.
pub fn write_regression_plot(
    records: &[CityRecord],
    regression: &HemisphereRegression,
    output_dir: &Path,
) -> Result<PathBuf, CityWeatherError> {
    let variable = regression.variable;
    let points: Vec<&CityRecord> = records
        .iter()
        .filter(|r| regression.hemisphere.contains(r.lat))
        .collect();

    let mut lats: Vec<f64> = points.iter().map(|r| r.lat).collect();
    let mut values: Vec<f64> = points.iter().map(|r| variable.value(r)).collect();
    let mut series: Vec<&str> = vec!["Data Points"; points.len()];
    lats.extend(points.iter().map(|r| r.lat));
    values.extend(points.iter().map(|r| regression.fit.predict(r.lat)));
    series.extend(std::iter::repeat("Regression Line").take(points.len()));

    let df = df!(
        "Lat" => lats,
        variable.column() => values,
        SERIES_COLUMN => series,
    )?;

    let path = output_dir.join(format!("{}.html", regression.file_stem()));
    let title = format!("{} ({})", regression.title(), regression.equation());
    ScatterPlot::builder()
        .data(&df)
        .x("Lat")
        .y(variable.column())
        .group(SERIES_COLUMN)
        .plot_title(title.as_str())
        .x_title(LATITUDE_LABEL)
        .y_title(variable.axis_label())
        .build()
        .write_html(path.to_string_lossy().to_string());
    info!("Wrote {}", path.display());
    Ok(path)
}
