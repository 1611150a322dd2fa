//! Row types flowing through both pipelines: the weather table row written to
//! the dataset and the narrower row the hotel search fills in.

use crate::types::lat_lon::LatLon;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder written into a row's hotel column when no hotel could be found.
pub const NO_HOTEL_FOUND: &str = "No hotel found";

/// One row of the weather table.
///
/// A record only exists for a city whose weather lookup succeeded, and it always
/// carries all of its fields. Field order matches the dataset column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    /// City name as it was sent to the weather service.
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Lat")]
    pub lat: f64,
    #[serde(rename = "Lng")]
    pub lng: f64,
    /// Maximum temperature in °C.
    #[serde(rename = "Max Temp")]
    pub max_temp: f64,
    /// Relative humidity, percent.
    #[serde(rename = "Humidity")]
    pub humidity: i64,
    /// Cloud cover, percent.
    #[serde(rename = "Cloudiness")]
    pub cloudiness: i64,
    /// Wind speed in m/s.
    #[serde(rename = "Wind Speed")]
    pub wind_speed: f64,
    /// ISO 3166 country code reported by the weather service.
    #[serde(rename = "Country")]
    pub country: String,
    /// Observation time, seconds since the Unix epoch.
    #[serde(rename = "Date")]
    pub date: i64,
}

impl CityRecord {
    pub fn location(&self) -> LatLon {
        LatLon(self.lat, self.lng)
    }

    /// The observation time as a UTC timestamp, `None` if `date` is out of range.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }
}

/// Calendar date (UTC) of the most recent observation among `records`.
pub fn latest_observation_date(records: &[CityRecord]) -> Option<NaiveDate> {
    records
        .iter()
        .filter_map(CityRecord::observed_at)
        .max()
        .map(|dt| dt.date_naive())
}

/// Final value of a row's hotel column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HotelName {
    /// Name of the first lodging returned by the places search.
    Found(String),
    /// The search produced no usable result.
    NotFound,
}

impl HotelName {
    pub fn as_str(&self) -> &str {
        match self {
            HotelName::Found(name) => name,
            HotelName::NotFound => NO_HOTEL_FOUND,
        }
    }
}

impl fmt::Display for HotelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A city that passed the weather preference filter, waiting for (or holding) a hotel.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredCityRecord {
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub humidity: i64,
    /// `None` until the hotel search has run for this row, then set once.
    pub hotel_name: Option<HotelName>,
}

impl FilteredCityRecord {
    pub fn location(&self) -> LatLon {
        LatLon(self.lat, self.lng)
    }

    /// Hotel column as displayed: empty before enrichment, name or sentinel after.
    pub fn hotel_display(&self) -> &str {
        self.hotel_name.as_ref().map_or("", HotelName::as_str)
    }
}

impl From<&CityRecord> for FilteredCityRecord {
    fn from(record: &CityRecord) -> Self {
        Self {
            city: record.city.clone(),
            country: record.country.clone(),
            lat: record.lat,
            lng: record.lng,
            humidity: record.humidity,
            hotel_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, date: i64) -> CityRecord {
        CityRecord {
            city: city.to_string(),
            lat: 10.0,
            lng: 20.0,
            max_temp: 25.0,
            humidity: 40,
            cloudiness: 0,
            wind_speed: 2.0,
            country: "XX".to_string(),
            date,
        }
    }

    #[test]
    fn test_hotel_name_display() {
        assert_eq!(HotelName::Found("Hotel Nord".into()).to_string(), "Hotel Nord");
        assert_eq!(HotelName::NotFound.to_string(), "No hotel found");
    }

    #[test]
    fn test_filtered_record_starts_without_hotel() {
        let filtered = FilteredCityRecord::from(&record("mahebourg", 0));
        assert_eq!(filtered.city, "mahebourg");
        assert_eq!(filtered.humidity, 40);
        assert!(filtered.hotel_name.is_none());
        assert_eq!(filtered.hotel_display(), "");
    }

    #[test]
    fn test_latest_observation_date() {
        let records = vec![record("a", 1_727_136_000), record("b", 1_727_222_400)];
        assert_eq!(
            latest_observation_date(&records),
            NaiveDate::from_ymd_opt(2024, 9, 25)
        );
        assert_eq!(latest_observation_date(&[]), None);
    }
}
