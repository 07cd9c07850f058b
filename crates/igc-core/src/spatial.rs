//! Great-circle distance math for track length calculations.

use crate::models::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate distance between two fixes in kilometers using the Haversine
/// formula.
///
/// This is the standard formula for great-circle distance between two
/// points on a sphere given their latitudes and longitudes.
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Cumulative distance over a fix sequence in kilometers.
///
/// Sums the pairwise distance between every consecutive pair in sequence
/// order, so reordering the fixes changes the result. Zero for fewer than
/// two fixes.
pub fn total_distance_km(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_km(&pair[0], &pair[1]))
        .sum()
}
