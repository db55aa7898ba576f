use serde::Deserialize;

/// A geocoded position in decimal degrees. Locations are referenced
/// everywhere else by their index in the input slice; the optimizer never
/// sees addresses or display names.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Location {
    lat: f64,
    lng: f64,
}

impl Location {
    pub fn from_lat_lng(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<&Location> for geo_types::Point {
    fn from(location: &Location) -> Self {
        geo_types::Point::new(location.lng(), location.lat())
    }
}
