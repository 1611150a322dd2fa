//! City maps as GeoJSON feature collections with simplestyle marker hints.

use crate::error::CityWeatherError;
use crate::types::city_record::{CityRecord, FilteredCityRecord};
use log::info;
use serde_json::{json, Map, Value};
use std::path::Path;

pub const CITY_MAP_FILE_NAME: &str = "city_map.geojson";
pub const HOTEL_MAP_FILE_NAME: &str = "hotel_map.geojson";
pub const HOTEL_MAP_TITLE: &str = "City Map with Hotels";

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// One point on a map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub city: String,
    pub lat: f64,
    pub lng: f64,
    pub humidity: i64,
    /// Extra hover columns, in order, after `City` and `Humidity`.
    pub extra: Vec<(&'static str, String)>,
}

impl From<&CityRecord> for MapPoint {
    fn from(record: &CityRecord) -> Self {
        Self {
            city: record.city.clone(),
            lat: record.lat,
            lng: record.lng,
            humidity: record.humidity,
            extra: Vec::new(),
        }
    }
}

impl From<&FilteredCityRecord> for MapPoint {
    fn from(row: &FilteredCityRecord) -> Self {
        Self {
            city: row.city.clone(),
            lat: row.lat,
            lng: row.lng,
            humidity: row.humidity,
            extra: vec![
                ("Country", row.country.clone()),
                ("Hotel Name", row.hotel_display().to_string()),
            ],
        }
    }
}

/// simplestyle marker size for a humidity percentage.
pub fn marker_size(humidity: i64) -> &'static str {
    match humidity {
        h if h < 34 => "small",
        h if h < 67 => "medium",
        _ => "large",
    }
}

/// A colour that depends only on the city name.
pub fn marker_color(city: &str) -> &'static str {
    // FNV-1a
    let hash = city.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    });
    PALETTE[(hash % PALETTE.len() as u64) as usize]
}

/// Builds a `FeatureCollection` with one point feature per entry of `points`.
pub fn feature_collection<'a, I>(points: I, title: Option<&str>) -> Value
where
    I: IntoIterator<Item = &'a MapPoint>,
{
    let features: Vec<Value> = points
        .into_iter()
        .map(|point| {
            let mut properties = Map::new();
            properties.insert("City".to_string(), json!(point.city));
            properties.insert("Humidity".to_string(), json!(point.humidity));
            for (key, value) in &point.extra {
                properties.insert(key.to_string(), json!(value));
            }
            properties.insert(
                "marker-size".to_string(),
                json!(marker_size(point.humidity)),
            );
            properties.insert("marker-color".to_string(), json!(marker_color(&point.city)));

            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [point.lng, point.lat],
                },
                "properties": properties,
            })
        })
        .collect();

    let mut collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    if let (Some(title), Some(object)) = (title, collection.as_object_mut()) {
        object.insert("name".to_string(), json!(title));
    }
    collection
}

/// Map of every city in the weather table, hovering `City` and `Humidity`.
pub fn city_map(records: &[CityRecord]) -> Value {
    let points: Vec<MapPoint> = records.iter().map(MapPoint::from).collect();
    feature_collection(&points, None)
}

/// Map of the filtered cities, also hovering `Country` and `Hotel Name`.
pub fn hotel_map(rows: &[FilteredCityRecord]) -> Value {
    let points: Vec<MapPoint> = rows.iter().map(MapPoint::from).collect();
    feature_collection(&points, Some(HOTEL_MAP_TITLE))
}

/// Writes a map as pretty-printed GeoJSON.
pub async fn write_map(map: &Value, path: &Path) -> Result<(), CityWeatherError> {
    let bytes = serde_json::to_vec_pretty(map).map_err(CityWeatherError::MapEncode)?;
    tokio::fs::write(path, &bytes)
        .await
        .map_err(|e| CityWeatherError::MapWrite(path.to_path_buf(), e))?;
    info!("Wrote map to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::store::tests::record;
    use crate::types::city_record::HotelName;

    #[test]
    fn test_marker_size_buckets() {
        assert_eq!(marker_size(0), "small");
        assert_eq!(marker_size(33), "small");
        assert_eq!(marker_size(34), "medium");
        assert_eq!(marker_size(66), "medium");
        assert_eq!(marker_size(67), "large");
        assert_eq!(marker_size(100), "large");
    }

    #[test]
    fn test_marker_color_is_stable() {
        assert_eq!(marker_color("hilo"), marker_color("hilo"));
        assert!(PALETTE.contains(&marker_color("mahebourg")));
    }

    #[test]
    fn test_city_map_has_one_feature_per_row() {
        let records = vec![
            record("mahebourg", -20.4, 24.0, 0, 3.1),
            record("hilo", 19.7, 25.5, 40, 2.6),
        ];
        let map = city_map(&records);

        assert_eq!(map["type"], "FeatureCollection");
        let features = map["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["coordinates"], json!([57.7, -20.4]));
        let properties = features[0]["properties"].as_object().unwrap();
        assert_eq!(properties["City"], "mahebourg");
        assert_eq!(properties["Humidity"], 61);
        assert_eq!(properties["marker-size"], "medium");
        assert!(!properties.contains_key("Hotel Name"));
        assert!(map.get("name").is_none());
    }

    #[test]
    fn test_hotel_map_shows_hotel_and_sentinel() {
        let mut found = FilteredCityRecord::from(&record("hilo", 19.7, 25.5, 0, 2.6));
        found.hotel_name = Some(HotelName::Found("Hilo Bay Hotel".to_string()));
        let mut missing = FilteredCityRecord::from(&record("nowhere", 1.0, 25.0, 0, 2.0));
        missing.hotel_name = Some(HotelName::NotFound);

        let map = hotel_map(&[found, missing]);

        assert_eq!(map["name"], HOTEL_MAP_TITLE);
        let features = map["features"].as_array().unwrap();
        assert_eq!(features[0]["properties"]["Hotel Name"], "Hilo Bay Hotel");
        assert_eq!(features[0]["properties"]["Country"], "MU");
        assert_eq!(features[1]["properties"]["Hotel Name"], "No hotel found");
    }

    #[tokio::test]
    async fn test_write_map() -> Result<(), CityWeatherError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CITY_MAP_FILE_NAME);
        let map = city_map(&[record("hilo", 19.7, 25.5, 40, 2.6)]);

        write_map(&map, &path).await?;

        let written: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written, map);
        Ok(())
    }
}
