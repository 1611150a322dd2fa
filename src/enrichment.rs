//! Hotel search for the cities that passed the weather filter.

use crate::clients::geoapify::first_place_name;
use crate::clients::{PlaceQuery, PlaceSource};
use crate::types::city_record::{FilteredCityRecord, HotelName};
use bon::bon;
use log::{debug, info};
use reqwest::StatusCode;
use std::time::Duration;

const DEFAULT_CATEGORIES: &str = "accommodation.hotel";
const DEFAULT_RADIUS_M: u32 = 10_000;
const RESULT_LIMIT: u32 = 1;

/// Fills in the hotel column of filtered cities using a places search.
pub struct HotelEnricher<P> {
    source: P,
    categories: String,
    radius_m: u32,
    delay: Duration,
}

#[bon]
impl<P: PlaceSource> HotelEnricher<P> {
    /// Creates an enricher.
    ///
    /// * `.source(P)`: **Required.** The places service to query.
    /// * `.categories(..)`: Optional. Place category. Defaults to `"accommodation.hotel"`.
    /// * `.radius_m(u32)`: Optional. Search radius around each city, metres. Defaults to `10000`.
    /// * `.delay(Duration)`: Optional. Pause after every search. Defaults to none.
    #[builder]
    pub fn new(
        source: P,
        #[builder(into)] categories: Option<String>,
        radius_m: Option<u32>,
        delay: Option<Duration>,
    ) -> Self {
        Self {
            source,
            categories: categories.unwrap_or_else(|| DEFAULT_CATEGORIES.to_string()),
            radius_m: radius_m.unwrap_or(DEFAULT_RADIUS_M),
            delay: delay.unwrap_or(Duration::ZERO),
        }
    }
}

impl<P: PlaceSource> HotelEnricher<P> {
    /// The search sent for a row: one lodging inside the radius, nearest first.
    pub fn query_for(&self, row: &FilteredCityRecord) -> PlaceQuery {
        PlaceQuery {
            categories: self.categories.clone(),
            limit: RESULT_LIMIT,
            center: row.location(),
            radius_m: self.radius_m,
        }
    }

    /// Sets the hotel of every row that does not have one yet.
    ///
    /// Each row ends with either the first place found or [`HotelName::NotFound`];
    /// a failed search never stops the batch. Rows that already carry a hotel are
    /// left untouched.
    pub async fn enrich(&self, rows: &mut [FilteredCityRecord]) {
        info!("Starting hotel search");

        for row in rows.iter_mut() {
            if row.hotel_name.is_some() {
                debug!("Hotel already set for {}, skipping search", row.city);
                continue;
            }

            let hotel = self.find_hotel(row).await;
            info!("{} - nearest hotel: {}", row.city, hotel);
            row.hotel_name = Some(hotel);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
    }

    /// Runs one search. Every failure mode ends in [`HotelName::NotFound`].
    pub async fn find_hotel(&self, row: &FilteredCityRecord) -> HotelName {
        let query = self.query_for(row);
        let response = match self.source.search_places(&query).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Places search failed for {}: {}", row.city, e.chain());
                return HotelName::NotFound;
            }
        };
        if response.status != StatusCode::OK {
            debug!(
                "Places search for {} returned status {}",
                row.city, response.status
            );
            return HotelName::NotFound;
        }
        match first_place_name(&row.city, &response.body) {
            Ok(name) => HotelName::Found(name),
            Err(e) => {
                debug!("No usable place for {}: {}", row.city, e.chain());
                HotelName::NotFound
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clients::error::LookupError;
    use crate::clients::ApiResponse;
    use std::cell::RefCell;
    use std::collections::HashMap;

    pub(crate) fn hotel_body(name: &str) -> String {
        format!(r#"{{"type":"FeatureCollection","features":[{{"properties":{{"name":"{name}"}}}}]}}"#)
    }

    /// Answers by the query's centre latitude (formatted), recording every query.
    #[derive(Default)]
    pub(crate) struct FakePlaces {
        pub responses: HashMap<String, ApiResponse>,
        pub queries: RefCell<Vec<PlaceQuery>>,
    }

    impl FakePlaces {
        pub fn with(mut self, lat: f64, status: StatusCode, body: impl Into<String>) -> Self {
            self.responses
                .insert(lat.to_string(), ApiResponse::new(status, body));
            self
        }
    }

    impl PlaceSource for FakePlaces {
        async fn search_places(&self, query: &PlaceQuery) -> Result<ApiResponse, LookupError> {
            self.queries.borrow_mut().push(query.clone());
            let key = query.center.lat().to_string();
            self.responses
                .get(&key)
                .cloned()
                .ok_or_else(|| LookupError::MissingField {
                    resource: key,
                    path: "<transport>".to_string(),
                })
        }
    }

    pub(crate) fn row(city: &str, lat: f64, lng: f64) -> FilteredCityRecord {
        FilteredCityRecord {
            city: city.to_string(),
            country: "MU".to_string(),
            lat,
            lng,
            humidity: 61,
            hotel_name: None,
        }
    }

    #[tokio::test]
    async fn test_every_row_gets_exactly_one_value() {
        let places = FakePlaces::default()
            .with(1.5, StatusCode::OK, hotel_body("Le Morne Lodge"))
            .with(2.5, StatusCode::OK, r#"{"type":"FeatureCollection","features":[]}"#)
            .with(3.5, StatusCode::OK, r#"{"features":[{"properties":{}}]}"#)
            .with(4.5, StatusCode::UNAUTHORIZED, r#"{"error":"Unauthorized"}"#);
        let enricher = HotelEnricher::builder().source(places).build();

        // Latitude 5.5 has no canned answer: the fake fails like a network error.
        let mut rows = vec![
            row("found", 1.5, 10.0),
            row("empty", 2.5, 10.0),
            row("unnamed", 3.5, 10.0),
            row("unauthorized", 4.5, 10.0),
            row("offline", 5.5, 10.0),
        ];
        enricher.enrich(&mut rows).await;

        assert_eq!(
            rows[0].hotel_name,
            Some(HotelName::Found("Le Morne Lodge".to_string()))
        );
        for row in &rows[1..] {
            assert_eq!(row.hotel_name, Some(HotelName::NotFound), "{}", row.city);
            assert_eq!(row.hotel_display(), "No hotel found");
        }
    }

    #[tokio::test]
    async fn test_query_uses_geofence_and_proximity_bias() {
        let places = FakePlaces::default().with(-20.4, StatusCode::OK, hotel_body("H"));
        let enricher = HotelEnricher::builder().source(places).build();

        let mut rows = vec![row("mahebourg", -20.4, 57.7)];
        enricher.enrich(&mut rows).await;

        let queries = enricher.source.queries.borrow();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].categories, "accommodation.hotel");
        assert_eq!(queries[0].limit, 1);
        assert_eq!(queries[0].radius_m, 10_000);
        assert_eq!(queries[0].filter_param(), "circle:57.7,-20.4,10000");
        assert_eq!(queries[0].bias_param(), "proximity:57.7,-20.4");
    }

    #[tokio::test]
    async fn test_rows_with_a_hotel_are_not_searched_again() {
        let places = FakePlaces::default().with(1.0, StatusCode::OK, hotel_body("New"));
        let enricher = HotelEnricher::builder()
            .source(places)
            .radius_m(5_000)
            .build();

        let mut done = row("done", 1.0, 1.0);
        done.hotel_name = Some(HotelName::Found("Old".to_string()));
        let mut rows = vec![done];
        enricher.enrich(&mut rows).await;

        assert_eq!(rows[0].hotel_name, Some(HotelName::Found("Old".to_string())));
        assert!(enricher.source.queries.borrow().is_empty());
    }
}
