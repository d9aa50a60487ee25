//! Great-circle distance on a spherical Earth.

use ranch_map_geography_models::Coordinate;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers, rounded to two
/// decimal places.
///
/// All inputs in degrees. Out-of-range values are not rejected; they produce
/// a defined but meaningless result.
#[must_use]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    round_hundredths(EARTH_RADIUS_KM * c)
}

/// Rounds to two decimal places.
#[must_use]
pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Extension for measuring between [`Coordinate`]s.
pub trait DistanceExt {
    /// Haversine distance to `other` in kilometers (two decimals).
    fn distance_km(&self, other: &Coordinate) -> f64;
}

impl DistanceExt for Coordinate {
    fn distance_km(&self, other: &Coordinate) -> f64 {
        distance_km(self.lat, self.lon, other.lat, other.lon)
    }
}
