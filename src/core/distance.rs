use geo::{HaversineDistance, Point};

use crate::models::Coordinate;

/// Signature of a distance primitive: two coordinates to kilometers
pub type DistanceFn = fn(Coordinate, Coordinate) -> f64;

/// Calculate the great-circle distance between two coordinates in kilometers
///
/// Uses the haversine formula on a sphere with the mean Earth radius.
/// The result is symmetric and non-negative.
#[inline]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let from = Point::new(a.longitude, a.latitude);
    let to = Point::new(b.longitude, b.latitude);

    from.haversine_distance(&to) / 1000.0
}

/// Round a distance to 2 decimal places for display
#[inline]
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
