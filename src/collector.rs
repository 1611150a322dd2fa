//! The weather collection loop. Cities are looked up one at a time and a failed
//! lookup drops the city without stopping the run.

use crate::clients::error::LookupError;
use crate::clients::open_weather::parse_current_weather;
use crate::clients::WeatherSource;
use crate::types::city_record::CityRecord;
use bon::bon;
use log::{info, warn};
use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;

const DEFAULT_DELAY: Duration = Duration::from_secs(1);
const SET_SIZE: usize = 50;

/// Why a city is missing from the collected table.
#[derive(Debug)]
pub enum SkipReason {
    /// The service answered with something other than 200 OK.
    NotFound(StatusCode),
    /// The request or the body read failed.
    Transport(LookupError),
    /// The body was not JSON or lacked one of the required fields.
    Malformed(LookupError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound(status) => write!(f, "city not found (status {status})"),
            SkipReason::Transport(e) | SkipReason::Malformed(e) => f.write_str(&e.chain()),
        }
    }
}

/// Result of looking up a single city.
#[derive(Debug)]
pub enum CityOutcome {
    Success(CityRecord),
    Skipped(SkipReason),
}

/// A city that was dropped, with the reason.
#[derive(Debug)]
pub struct SkippedCity {
    pub city: String,
    pub reason: SkipReason,
}

/// Everything a collection run produced.
#[derive(Debug, Default)]
pub struct CollectionReport {
    /// One record per successful lookup, in input order.
    pub records: Vec<CityRecord>,
    pub skipped: Vec<SkippedCity>,
}

impl CollectionReport {
    pub fn attempted(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

/// Progress labels in "Record r of Set s" form.
///
/// Sets hold 50 cities. The first set numbers its records from 1, later sets from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressCounter {
    record: usize,
    set: usize,
}

impl Default for ProgressCounter {
    fn default() -> Self {
        Self { record: 1, set: 1 }
    }
}

impl ProgressCounter {
    /// Labels the city at position `index` and advances. Returns `(record, set)`.
    pub fn advance(&mut self, index: usize) -> (usize, usize) {
        if index >= SET_SIZE && index % SET_SIZE == 0 {
            self.set += 1;
            self.record = 0;
        }
        let label = (self.record, self.set);
        self.record += 1;
        label
    }
}

/// Fetches current weather for a list of cities, one request at a time.
pub struct WeatherCollector<S> {
    source: S,
    delay: Duration,
}

#[bon]
impl<S: WeatherSource> WeatherCollector<S> {
    /// Creates a collector.
    ///
    /// * `.source(S)`: **Required.** The weather service to query.
    /// * `.delay(Duration)`: Optional. Pause after every lookup. Defaults to one second.
    #[builder]
    pub fn new(source: S, delay: Option<Duration>) -> Self {
        Self {
            source,
            delay: delay.unwrap_or(DEFAULT_DELAY),
        }
    }
}

impl<S: WeatherSource> WeatherCollector<S> {
    /// Looks up every city in order and keeps the ones that succeeded.
    ///
    /// Never fails: a city whose lookup fails is logged and listed in
    /// [`CollectionReport::skipped`]. The configured delay is awaited after every
    /// attempt, successful or not.
    pub async fn collect(&self, cities: &[String]) -> CollectionReport {
        let mut report = CollectionReport::default();
        let mut progress = ProgressCounter::default();

        info!("Beginning Data Retrieval     ");
        info!("-----------------------------");

        for (i, city) in cities.iter().enumerate() {
            let (record, set) = progress.advance(i);
            info!("Processing Record {} of Set {} | {}", record, set, city);

            match self.lookup(city).await {
                CityOutcome::Success(city_record) => report.records.push(city_record),
                CityOutcome::Skipped(reason) => {
                    match &reason {
                        SkipReason::NotFound(status) => {
                            warn!("City not found. Skipping {} (status {})...", city, status)
                        }
                        SkipReason::Transport(e) | SkipReason::Malformed(e) => {
                            warn!("Error occurred for city {}: {}", city, e.chain())
                        }
                    }
                    report.skipped.push(SkippedCity {
                        city: city.clone(),
                        reason,
                    });
                }
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        info!("-----------------------------");
        info!("Data Retrieval Complete      ");
        info!("-----------------------------");
        info!(
            "Collected {} of {} cities ({} skipped)",
            report.records.len(),
            cities.len(),
            report.skipped.len()
        );
        report
    }

    /// Looks up one city. All eight fields are extracted or the city is skipped.
    pub async fn lookup(&self, city: &str) -> CityOutcome {
        let response = match self.source.current_weather(city).await {
            Ok(response) => response,
            Err(e) => return CityOutcome::Skipped(SkipReason::Transport(e)),
        };
        if response.status != StatusCode::OK {
            return CityOutcome::Skipped(SkipReason::NotFound(response.status));
        }
        match parse_current_weather(city, &response.body) {
            Ok(record) => CityOutcome::Success(record),
            Err(e) => CityOutcome::Skipped(SkipReason::Malformed(e)),
        }
    }
}
