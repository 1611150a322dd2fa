//! Defines the gazetteer entry used for nearest-city resolution, including the
//! implementations necessary for spatial indexing using the `rstar` crate.

use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

// --- Data Structures ---

/// A named city from the world-cities table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GazetteerCity {
    /// City name, lowercase as it appears in the table (e.g., "ushuaia").
    pub name: String,
    /// Two-letter country code, lowercase (e.g., "ar").
    pub country: String,
    /// Geographical location of the city.
    pub location: Location,
}

/// Represents the geographical location of a city.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees (positive for North, negative for South).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East, negative for West).
    pub longitude: f64,
}

impl GazetteerCity {
    pub fn new(name: impl Into<String>, country: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            location: Location {
                latitude,
                longitude,
            },
        }
    }
}

// --- R-Tree Implementations ---

/// Lets a `GazetteerCity` live in an R-tree as a point at (latitude, longitude).
impl RTreeObject for GazetteerCity {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.latitude, self.location.longitude])
    }
}

impl PointDistance for GazetteerCity {
    /// Squared Euclidean distance in degree space: `(lat - q_lat)^2 + (lon - q_lon)^2`.
    ///
    /// Only used to rank R-tree candidates; the locator re-ranks the closest few
    /// by great-circle distance.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.location.latitude - point[0];
        let dy = self.location.longitude - point[1];
        dx * dx + dy * dy
    }
}
