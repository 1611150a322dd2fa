//! Random coordinate sampling and nearest-city de-duplication.

use crate::types::lat_lon::LatLon;
use bon::bon;
use log::info;
use rand::Rng;
use std::collections::HashSet;
use std::ops::RangeInclusive;

const DEFAULT_SAMPLE_COUNT: usize = 1500;
const LAT_RANGE: RangeInclusive<f64> = -90.0..=90.0;
const LNG_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// Resolves a coordinate to the name of the closest known city.
pub trait NearestCity {
    fn nearest_city_name(&self, location: LatLon) -> Option<String>;
}

/// Draws uniformly random coordinates and turns them into a list of unique city names.
#[derive(Debug, Clone)]
pub struct CitySampler {
    sample_count: usize,
    lat_range: RangeInclusive<f64>,
    lng_range: RangeInclusive<f64>,
}

#[bon]
impl CitySampler {
    /// Creates a sampler.
    ///
    /// * `.sample_count(usize)`: Optional. Number of coordinates drawn. Defaults to `1500`.
    /// * `.lat_range(..)` / `.lng_range(..)`: Optional. Defaults to the full legal ranges
    ///   `[-90, 90]` and `[-180, 180]`.
    #[builder]
    pub fn new(
        sample_count: Option<usize>,
        lat_range: Option<RangeInclusive<f64>>,
        lng_range: Option<RangeInclusive<f64>>,
    ) -> Self {
        Self {
            sample_count: sample_count.unwrap_or(DEFAULT_SAMPLE_COUNT),
            lat_range: lat_range.unwrap_or(LAT_RANGE),
            lng_range: lng_range.unwrap_or(LNG_RANGE),
        }
    }
}

impl Default for CitySampler {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CitySampler {
    /// Draws `sample_count` random coordinates.
    pub fn random_coordinates<R: Rng>(&self, rng: &mut R) -> Vec<LatLon> {
        (0..self.sample_count)
            .map(|_| {
                LatLon(
                    rng.gen_range(self.lat_range.clone()),
                    rng.gen_range(self.lng_range.clone()),
                )
            })
            .collect()
    }

    /// Samples coordinates and resolves each to its nearest city, keeping the first
    /// occurrence of every name in the order it was drawn.
    pub fn sample_cities<R, N>(&self, rng: &mut R, locator: &N) -> Vec<String>
    where
        R: Rng,
        N: NearestCity + ?Sized,
    {
        let cities = unique_city_names(self.random_coordinates(rng), locator);
        info!("Number of cities in the list: {}", cities.len());
        cities
    }
}

/// Resolves each coordinate to a city name, dropping names already seen.
pub fn unique_city_names<I, N>(coordinates: I, locator: &N) -> Vec<String>
where
    I: IntoIterator<Item = LatLon>,
    N: NearestCity + ?Sized,
{
    let mut seen = HashSet::new();
    let mut cities = Vec::new();
    for location in coordinates {
        let Some(name) = locator.nearest_city_name(location) else {
            continue;
        };
        if seen.insert(name.clone()) {
            cities.push(name);
        }
    }
    cities
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Names a coordinate by its latitude band, 30° wide.
    struct BandLocator;

    impl NearestCity for BandLocator {
        fn nearest_city_name(&self, location: LatLon) -> Option<String> {
            Some(format!("band{}", ((location.lat() + 90.0) / 30.0).floor() as i32))
        }
    }

    #[test]
    fn test_random_coordinates_within_ranges() {
        let sampler = CitySampler::default();
        let mut rng = StdRng::seed_from_u64(7);
        let coordinates = sampler.random_coordinates(&mut rng);

        assert_eq!(coordinates.len(), 1500);
        assert!(coordinates
            .iter()
            .all(|c| (-90.0..=90.0).contains(&c.lat()) && (-180.0..=180.0).contains(&c.lon())));
    }

    #[test]
    fn test_unique_city_names_preserves_first_seen_order() {
        let coordinates = vec![
            LatLon(-80.0, 0.0), // band0
            LatLon(10.0, 0.0),  // band3
            LatLon(-85.0, 1.0), // band0 again
            LatLon(70.0, 0.0),  // band5
            LatLon(15.0, 9.0),  // band3 again
        ];
        let names = unique_city_names(coordinates, &BandLocator);
        assert_eq!(names, vec!["band0", "band3", "band5"]);
    }

    #[test]
    fn test_sample_cities_has_no_duplicates() {
        let sampler = CitySampler::builder().sample_count(200).build();
        let mut rng = StdRng::seed_from_u64(42);
        let names = sampler.sample_cities(&mut rng, &BandLocator);

        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        assert!(names.len() <= 200);
        // Six 30° bands cover [-90, 90]; 90 itself falls in a seventh.
        assert!(names.len() <= 7);
    }

    #[test]
    fn test_same_seed_same_cities() {
        let sampler = CitySampler::builder().sample_count(50).build();
        let first = sampler.sample_cities(&mut StdRng::seed_from_u64(1), &BandLocator);
        let second = sampler.sample_cities(&mut StdRng::seed_from_u64(1), &BandLocator);
        assert_eq!(first, second);
    }
}
