//! OpenWeatherMap "current weather" client and the parser that turns one of its
//! responses into a [`CityRecord`].

use crate::clients::error::LookupError;
use crate::clients::{send, ApiResponse, WeatherSource};
use crate::types::city_record::CityRecord;
use bon::bon;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
const DEFAULT_UNITS: &str = "metric";

/// The parts of a current-weather response the dataset keeps.
///
/// Every field is required, so a response lacking any of them fails to parse and
/// no partial record can be built.
#[derive(Debug, Deserialize)]
struct CurrentWeather {
    coord: Coord,
    main: Main,
    clouds: Clouds,
    wind: Wind,
    sys: Sys,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct Coord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp_max: f64,
    humidity: i64,
}

#[derive(Debug, Deserialize)]
struct Clouds {
    all: i64,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Sys {
    country: String,
}

/// Extracts a [`CityRecord`] for `city` from a current-weather JSON body.
///
/// # Errors
///
/// Returns [`LookupError::JsonParse`] if the body is not JSON or any of
/// `coord.lat`, `coord.lon`, `main.temp_max`, `main.humidity`, `clouds.all`,
/// `wind.speed`, `sys.country` or `dt` is absent.
pub fn parse_current_weather(city: &str, body: &str) -> Result<CityRecord, LookupError> {
    let weather: CurrentWeather =
        serde_json::from_str(body).map_err(|e| LookupError::JsonParse {
            resource: city.to_string(),
            source: e,
        })?;

    Ok(CityRecord {
        city: city.to_string(),
        lat: weather.coord.lat,
        lng: weather.coord.lon,
        max_temp: weather.main.temp_max,
        humidity: weather.main.humidity,
        cloudiness: weather.clouds.all,
        wind_speed: weather.wind.speed,
        country: weather.sys.country,
        date: weather.dt,
    })
}

/// Client for `GET /data/2.5/weather?q=<city>&appid=<key>&units=<units>`.
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
}

#[bon]
impl OpenWeatherClient {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `.api_key(..)`: **Required.** OpenWeatherMap API key.
    /// * `.base_url(..)`: Optional. Endpoint URL. Defaults to [`DEFAULT_BASE_URL`].
    /// * `.units(..)`: Optional. Unit system. Defaults to `"metric"` (°C, m/s).
    #[builder]
    pub fn new(
        #[builder(into)] api_key: String,
        #[builder(into)] base_url: Option<String>,
        #[builder(into)] units: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            units: units.unwrap_or_else(|| DEFAULT_UNITS.to_string()),
        }
    }
}

impl WeatherSource for OpenWeatherClient {
    async fn current_weather(&self, city: &str) -> Result<ApiResponse, LookupError> {
        let request = self.client.get(&self.base_url).query(&[
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", self.units.as_str()),
        ]);
        send(request, &self.base_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUERTO_AYORA: &str = r#"{
        "coord": {"lon": -90.3518, "lat": -0.7393},
        "weather": [{"id": 803, "main": "Clouds"}],
        "main": {"temp": 22.97, "temp_min": 22.97, "temp_max": 22.97, "pressure": 1013, "humidity": 87},
        "wind": {"speed": 4.47, "deg": 151},
        "clouds": {"all": 70},
        "dt": 1727204432,
        "sys": {"country": "EC", "sunrise": 1727180000},
        "name": "Puerto Ayora",
        "cod": 200
    }"#;

    #[test]
    fn test_parse_current_weather() {
        let record = parse_current_weather("puerto ayora", PUERTO_AYORA).unwrap();
        assert_eq!(
            record,
            CityRecord {
                city: "puerto ayora".to_string(),
                lat: -0.7393,
                lng: -90.3518,
                max_temp: 22.97,
                humidity: 87,
                cloudiness: 70,
                wind_speed: 4.47,
                country: "EC".to_string(),
                date: 1727204432,
            }
        );
    }

    #[test]
    fn test_parse_missing_field_is_rejected() {
        // Dropping any one of the eight kept fields fails the whole record.
        let fields = [
            ("/coord", "lat"),
            ("/coord", "lon"),
            ("/main", "temp_max"),
            ("/main", "humidity"),
            ("/clouds", "all"),
            ("/wind", "speed"),
            ("/sys", "country"),
            ("", "dt"),
        ];
        for (parent, key) in fields {
            let mut body: serde_json::Value = serde_json::from_str(PUERTO_AYORA).unwrap();
            let removed = body
                .pointer_mut(parent)
                .and_then(|object| object.as_object_mut())
                .and_then(|object| object.remove(key));
            assert!(removed.is_some(), "{parent}/{key} not in the fixture");

            let result = parse_current_weather("puerto ayora", &body.to_string());
            assert!(
                matches!(result, Err(LookupError::JsonParse { .. })),
                "expected parse failure without {parent}/{key}"
            );
        }
    }

    #[test]
    fn test_parse_not_json() {
        let result = parse_current_weather("x", "<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(LookupError::JsonParse { .. })));
    }
}
