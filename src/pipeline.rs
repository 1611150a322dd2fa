//! The two end-to-end runs: the weather survey that builds and analyses the
//! dataset, and the vacation planner that reads it back and looks for hotels.

use crate::analysis::{regress_against_latitude, Hemisphere, HemisphereRegression};
use crate::clients::geoapify::GeoapifyClient;
use crate::clients::open_weather::OpenWeatherClient;
use crate::clients::{PlaceSource, WeatherSource};
use crate::collector::{CollectionReport, WeatherCollector};
use crate::config::Config;
use crate::dataset::store::{dataframe_to_records, DatasetStore};
use crate::enrichment::HotelEnricher;
use crate::error::CityWeatherError;
use crate::filtering::{apply_preference, filtered_city_records, WeatherPreference};
use crate::gazetteer::city_locator::CityLocator;
use crate::map::{city_map, hotel_map, write_map, CITY_MAP_FILE_NAME, HOTEL_MAP_FILE_NAME};
use crate::sampler::CitySampler;
use crate::types::city_record::{latest_observation_date, CityRecord, FilteredCityRecord};
use crate::types::weather_variable::WeatherVariable;
use crate::utils::{ensure_dir_exists, get_cache_dir};
use log::{info, warn};
use polars::prelude::DataFrame;
use std::path::Path;

/// What a weather survey run produced.
#[derive(Debug)]
pub struct SurveySummary {
    pub report: CollectionReport,
    pub regressions: Vec<HemisphereRegression>,
}

/// Samples cities, collects their weather, stores the table and analyses it.
pub async fn run_weather_survey(config: &Config) -> Result<SurveySummary, CityWeatherError> {
    let api_key = config.require_weather_api_key()?;
    ensure_dir_exists(&config.output_dir).await?;

    let cache_dir = match &config.cache_dir {
        Some(dir) => dir.clone(),
        None => get_cache_dir()?,
    };
    ensure_dir_exists(&cache_dir).await?;
    let locator = CityLocator::load(&cache_dir, config.gazetteer_path.as_deref()).await?;

    let cities = CitySampler::default().sample_cities(&mut rand::thread_rng(), &locator);

    let collector = WeatherCollector::builder()
        .source(OpenWeatherClient::builder().api_key(api_key).build())
        .build();
    let store = DatasetStore::new(config.dataset_path());
    let report = collect_and_store(&collector, &cities, &store).await?;

    let records = store.load().await?;
    let regressions = analyse(&records, &config.output_dir)?;

    Ok(SurveySummary {
        report,
        regressions,
    })
}

/// Runs the collector over `cities` and writes whatever succeeded to `store`.
pub async fn collect_and_store<S: WeatherSource>(
    collector: &WeatherCollector<S>,
    cities: &[String],
    store: &DatasetStore,
) -> Result<CollectionReport, CityWeatherError> {
    let report = collector.collect(cities).await;
    store.save(&report.records).await?;
    Ok(report)
}

/// Latitude scatters and the eight hemisphere regressions over `records`.
///
/// A regression that cannot be fitted, e.g. a hemisphere with a single city, is
/// logged and left out.
pub fn analyse(
    records: &[CityRecord],
    #[cfg_attr(not(feature = "plots"), allow(unused_variables))] output_dir: &Path,
) -> Result<Vec<HemisphereRegression>, CityWeatherError> {
    let date = latest_observation_date(records);
    match date {
        Some(date) => info!("Most recent observation: {}", date),
        None => warn!("No observations to analyse"),
    }

    #[cfg(feature = "plots")]
    for variable in WeatherVariable::ALL {
        crate::plotting::write_latitude_scatter(records, variable, date, output_dir)?;
    }

    let mut regressions = Vec::new();
    for variable in WeatherVariable::ALL {
        for hemisphere in Hemisphere::ALL {
            let regression = match regress_against_latitude(records, hemisphere, variable) {
                Ok(regression) => regression,
                Err(e) => {
                    warn!(
                        "Skipping {} regression for the {} hemisphere: {}",
                        variable, hemisphere, e
                    );
                    continue;
                }
            };
            info!("{}", regression.title());
            info!("The r^2-value is: {}", regression.fit.r_squared());
            info!("{}", regression.equation());

            #[cfg(feature = "plots")]
            crate::plotting::write_regression_plot(records, &regression, output_dir)?;

            regressions.push(regression);
        }
    }
    Ok(regressions)
}

/// Reads the stored dataset, maps it, and looks for hotels in the cities with the
/// default weather preference.
pub async fn run_vacation_planner(
    config: &Config,
) -> Result<Vec<FilteredCityRecord>, CityWeatherError> {
    let api_key = config.require_geoapify_api_key()?;
    let df = DatasetStore::new(config.dataset_path()).load_frame().await?;

    let enricher = HotelEnricher::builder()
        .source(GeoapifyClient::new(api_key))
        .build();
    plan_vacation(
        &enricher,
        df,
        &WeatherPreference::default(),
        &config.output_dir,
    )
    .await
}

/// Writes the city map, filters by `preference`, finds hotels and writes the hotel map.
pub async fn plan_vacation<P: PlaceSource>(
    enricher: &HotelEnricher<P>,
    df: DataFrame,
    preference: &WeatherPreference,
    output_dir: &Path,
) -> Result<Vec<FilteredCityRecord>, CityWeatherError> {
    ensure_dir_exists(output_dir).await?;

    let records = dataframe_to_records(&df)?;
    write_map(&city_map(&records), &output_dir.join(CITY_MAP_FILE_NAME)).await?;

    let filtered = apply_preference(df, preference)?;
    let mut rows = filtered_city_records(&filtered)?;
    if rows.is_empty() {
        warn!("No city matches the weather preference");
    }

    enricher.enrich(&mut rows).await;
    write_map(&hotel_map(&rows), &output_dir.join(HOTEL_MAP_FILE_NAME)).await?;
    Ok(rows)
}
