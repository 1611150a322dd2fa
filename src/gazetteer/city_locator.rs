use crate::gazetteer::error::GazetteerError;
use crate::sampler::NearestCity;
use crate::types::gazetteer_city::GazetteerCity;
use crate::types::lat_lon::LatLon;
use bincode::config::{Configuration, Fixint, LittleEndian};
use haversine::{distance, Location as HaversineLocation, Units};
use log::{info, warn};
use ordered_float::OrderedFloat;
use polars::prelude::*;
use reqwest::Client;
use rstar::RTree;
use std::io::Cursor;
use std::path::Path;

const DATA_URL: &str = "https://raw.githubusercontent.com/wingchen/citipy/master/citipy/worldcities.csv";
const BINCODE_CACHE_FILE_NAME: &str = "worldcities.bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

const COL_COUNTRY: &str = "Country";
const COL_CITY: &str = "City";
const COL_LATITUDE: &str = "Latitude";
const COL_LONGITUDE: &str = "Longitude";

/// How many R-tree neighbours get re-ranked by great-circle distance.
const CANDIDATE_LIMIT: usize = 8;

/// Nearest-city index over the world-cities table.
#[derive(Debug, Clone)]
pub struct CityLocator {
    rtree: RTree<GazetteerCity>,
}

impl CityLocator {
    /// Loads the world-cities table and builds the index.
    ///
    /// With `local_table` set, that CSV is read directly. Otherwise the binary cache in
    /// `cache_dir` is used, falling back to downloading the table and writing the cache.
    pub async fn load(
        cache_dir: &Path,
        local_table: Option<&Path>,
    ) -> Result<Self, GazetteerError> {
        let cities = match local_table {
            Some(path) => {
                info!("Reading world cities table from {}", path.display());
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| GazetteerError::SourceRead(path.to_path_buf(), e))?;
                tokio::task::spawn_blocking(move || Self::parse_cities(bytes)).await??
            }
            None => {
                let cache_file = cache_dir.join(BINCODE_CACHE_FILE_NAME);
                if cache_file.exists() {
                    let path_clone = cache_file.clone();
                    tokio::task::spawn_blocking(move || Self::get_cached_cities(&path_clone))
                        .await??
                } else {
                    warn!("Cache file not found. Fetching from URL: {}", DATA_URL);
                    let cities = Self::fetch_cities().await?;
                    Self::cache_cities(cities.clone(), &cache_file).await?;
                    cities
                }
            }
        };

        Self::from_cities(cities)
    }

    /// Builds the index from an in-memory list of cities.
    pub fn from_cities(cities: Vec<GazetteerCity>) -> Result<Self, GazetteerError> {
        if cities.is_empty() {
            return Err(GazetteerError::Empty);
        }
        Ok(CityLocator {
            rtree: RTree::bulk_load(cities),
        })
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// Finds the city closest to `location` and its great-circle distance in km.
    pub fn nearest(&self, location: LatLon) -> Option<(&GazetteerCity, f64)> {
        let query_point_rtree = [location.lat(), location.lon()];

        self.rtree
            .nearest_neighbor_iter(&query_point_rtree)
            .take(CANDIDATE_LIMIT)
            .map(|city| {
                let query = HaversineLocation {
                    latitude: location.lat(),
                    longitude: location.lon(),
                };
                let city_loc = HaversineLocation {
                    latitude: city.location.latitude,
                    longitude: city.location.longitude,
                };
                (city, distance(query, city_loc, Units::Kilometers))
            })
            .min_by_key(|(_, dist_km)| OrderedFloat(*dist_km))
    }

    /// Parses the `Country,City,Latitude,Longitude` CSV. Rows with a missing value are dropped.
    pub fn parse_cities(bytes: Vec<u8>) -> Result<Vec<GazetteerCity>, GazetteerError> {
        let df = CsvReader::new(Cursor::new(bytes))
            .finish()
            .map_err(GazetteerError::CsvParse)?;

        let names = string_column(&df, COL_CITY)?;
        let countries = string_column(&df, COL_COUNTRY)?;
        let lat_column = float_column(&df, COL_LATITUDE)?;
        let lon_column = float_column(&df, COL_LONGITUDE)?;
        let lats = lat_column
            .f64()
            .map_err(|e| GazetteerError::ColumnNotFound(COL_LATITUDE.to_string(), e))?;
        let lons = lon_column
            .f64()
            .map_err(|e| GazetteerError::ColumnNotFound(COL_LONGITUDE.to_string(), e))?;

        let cities: Vec<GazetteerCity> = names
            .into_iter()
            .zip(countries)
            .zip(lats)
            .zip(lons)
            .filter_map(|(((name, country), lat), lon)| {
                Some(GazetteerCity::new(name?, country?, lat?, lon?))
            })
            .collect();

        if cities.is_empty() {
            return Err(GazetteerError::Empty);
        }
        info!("Parsed {} cities from world cities table", cities.len());
        Ok(cities)
    }

    fn get_cached_cities(cache_path: &Path) -> Result<Vec<GazetteerCity>, GazetteerError> {
        let bytes = std::fs::read(cache_path)
            .map_err(|e| GazetteerError::CacheRead(cache_path.to_path_buf(), e))?;
        let (decoded_cities, _) =
            bincode::serde::decode_from_slice::<Vec<GazetteerCity>, _>(&bytes, BINCODE_CONFIG)
                .map_err(|e| GazetteerError::CacheDecode(cache_path.to_path_buf(), Box::from(e)))?;
        Ok(decoded_cities)
    }

    async fn fetch_cities() -> Result<Vec<GazetteerCity>, GazetteerError> {
        let client = Client::new();
        let response = client
            .get(DATA_URL)
            .send()
            .await
            .map_err(|e| GazetteerError::NetworkRequest(DATA_URL.to_string(), e))?;
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(match e.status() {
                    Some(status) => GazetteerError::HttpStatus {
                        url: DATA_URL.to_string(),
                        status,
                        source: e,
                    },
                    None => GazetteerError::NetworkRequest(DATA_URL.to_string(), e),
                });
            }
        };
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GazetteerError::NetworkRequest(DATA_URL.to_string(), e))?;

        let parse_start = std::time::Instant::now();
        let cities =
            tokio::task::spawn_blocking(move || Self::parse_cities(bytes.to_vec())).await??;
        info!(
            "Parsed {} cities from CSV in {:?}",
            cities.len(),
            parse_start.elapsed()
        );
        Ok(cities)
    }

    async fn cache_cities(
        cities: Vec<GazetteerCity>,
        cache_path: &Path,
    ) -> Result<(), GazetteerError> {
        let bincode_data = tokio::task::spawn_blocking(move || {
            bincode::serde::encode_to_vec(cities, BINCODE_CONFIG)
                .map_err(|e| GazetteerError::CacheEncode(Box::new(e)))
        })
        .await??;
        tokio::fs::write(cache_path, &bincode_data)
            .await
            .map_err(|e| GazetteerError::CacheWrite(cache_path.to_path_buf(), e))?;
        info!(
            "Wrote gazetteer cache ({} bytes) to {}",
            bincode_data.len(),
            cache_path.display()
        );
        Ok(())
    }
}

impl NearestCity for CityLocator {
    fn nearest_city_name(&self, location: LatLon) -> Option<String> {
        self.nearest(location).map(|(city, _)| city.name.clone())
    }
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked, GazetteerError> {
    df.column(name)
        .and_then(|c| c.str())
        .map_err(|e| GazetteerError::ColumnNotFound(name.to_string(), e))
}

fn float_column(df: &DataFrame, name: &str) -> Result<Column, GazetteerError> {
    df.column(name)
        .and_then(|c| c.cast(&DataType::Float64))
        .map_err(|e| GazetteerError::ColumnNotFound(name.to_string(), e))
}
