mod analysis;
mod clients;
mod collector;
mod config;
mod dataset;
mod enrichment;
mod error;
mod filtering;
mod gazetteer;
mod map;
mod pipeline;
#[cfg(feature = "plots")]
mod plotting;
mod sampler;
mod types;
mod utils;

pub use error::CityWeatherError;
pub use pipeline::*;

pub use analysis::error::AnalysisError;
pub use analysis::*;

pub use clients::error::LookupError;
pub use clients::geoapify::GeoapifyClient;
pub use clients::open_weather::{parse_current_weather, OpenWeatherClient};
pub use clients::{ApiResponse, PlaceQuery, PlaceSource, WeatherSource};

pub use collector::*;
pub use config::{Config, ConfigError};
pub use dataset::error::DatasetError;
pub use dataset::store::{dataframe_to_records, records_to_dataframe, DatasetStore};
pub use enrichment::HotelEnricher;
pub use filtering::*;
pub use gazetteer::city_locator::CityLocator;
pub use gazetteer::error::GazetteerError;
pub use map::{city_map, hotel_map, write_map};
#[cfg(feature = "plots")]
pub use plotting::*;
pub use sampler::*;

pub use types::city_record::*;
pub use types::gazetteer_city::*;
pub use types::lat_lon::LatLon;
pub use types::weather_variable::WeatherVariable;
