/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use cityweather::LatLon;
///
/// let cape_town = LatLon(-33.9258, 18.4232);
/// assert_eq!(cape_town.0, -33.9258); // Latitude
/// assert_eq!(cape_town.1, 18.4232); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lon(&self) -> f64 {
        self.1
    }
}
