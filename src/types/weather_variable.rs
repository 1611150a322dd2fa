//! The weather columns that get plotted and regressed against latitude.

use crate::analysis::Hemisphere;
use crate::types::city_record::CityRecord;
use chrono::NaiveDate;
use std::fmt;

/// A weather variable of the dataset that is analysed against latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherVariable {
    /// Maximum temperature, °C.
    MaxTemp,
    /// Relative humidity, percent.
    Humidity,
    /// Cloud cover, percent.
    Cloudiness,
    /// Wind speed, m/s.
    WindSpeed,
}

impl WeatherVariable {
    /// All variables, in figure order.
    pub const ALL: [WeatherVariable; 4] = [
        WeatherVariable::MaxTemp,
        WeatherVariable::Humidity,
        WeatherVariable::Cloudiness,
        WeatherVariable::WindSpeed,
    ];

    /// Column name in the dataset.
    pub fn column(&self) -> &'static str {
        match self {
            WeatherVariable::MaxTemp => "Max Temp",
            WeatherVariable::Humidity => "Humidity",
            WeatherVariable::Cloudiness => "Cloudiness",
            WeatherVariable::WindSpeed => "Wind Speed",
        }
    }

    /// This variable's value in `record`.
    pub fn value(&self, record: &CityRecord) -> f64 {
        match self {
            WeatherVariable::MaxTemp => record.max_temp,
            WeatherVariable::Humidity => record.humidity as f64,
            WeatherVariable::Cloudiness => record.cloudiness as f64,
            WeatherVariable::WindSpeed => record.wind_speed,
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            WeatherVariable::MaxTemp => "Max Temperature (C)",
            WeatherVariable::Humidity => "Humidity (%)",
            WeatherVariable::Cloudiness => "Cloudiness (%)",
            WeatherVariable::WindSpeed => "Wind Speed (m/s)",
        }
    }

    /// Short name used in plot titles.
    pub fn title_name(&self) -> &'static str {
        match self {
            WeatherVariable::MaxTemp => "Temperature",
            WeatherVariable::Humidity => "Humidity",
            WeatherVariable::Cloudiness => "Cloudiness",
            WeatherVariable::WindSpeed => "Wind Speed",
        }
    }

    /// File stem of the latitude scatter figure (`Fig1` .. `Fig4`).
    pub fn figure_stem(&self) -> &'static str {
        match self {
            WeatherVariable::MaxTemp => "Fig1",
            WeatherVariable::Humidity => "Fig2",
            WeatherVariable::Cloudiness => "Fig3",
            WeatherVariable::WindSpeed => "Fig4",
        }
    }

    /// Title of the latitude scatter, dated by the most recent observation.
    pub fn scatter_title(&self, date: Option<NaiveDate>) -> String {
        match date {
            Some(date) => format!("City Max Latitude vs. {} ({})", self.title_name(), date),
            None => format!("City Max Latitude vs. {}", self.title_name()),
        }
    }

    /// Where the equation is annotated on the regression plot for this hemisphere.
    pub fn annotation_anchor(&self, hemisphere: Hemisphere) -> (f64, f64) {
        match (self, hemisphere) {
            (WeatherVariable::MaxTemp, Hemisphere::Northern) => (5.8, 0.1),
            (WeatherVariable::MaxTemp, Hemisphere::Southern) => (-25.0, 5.8),
            (WeatherVariable::Humidity, Hemisphere::Northern) => (45.0, 20.0),
            (WeatherVariable::Humidity, Hemisphere::Southern) => (-55.0, 45.0),
            (WeatherVariable::Cloudiness, Hemisphere::Northern) => (46.0, 20.0),
            (WeatherVariable::Cloudiness, Hemisphere::Southern) => (-55.0, 20.0),
            (WeatherVariable::WindSpeed, Hemisphere::Northern) => (2.0, 9.5),
            (WeatherVariable::WindSpeed, Hemisphere::Southern) => (-55.0, 9.0),
        }
    }
}

impl fmt::Display for WeatherVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}
