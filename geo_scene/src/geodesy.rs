//! Great-circle measurements between geographic positions.
//!
//! The earth is treated as a sphere with the WGS84 semi-major axis as radius.
//! This is not an ellipsoidal geodesic, but the error stays well below the
//! precision needed at city scale.

use crate::geometry::GeoCoordinate;
use crate::utm::WGS84_A;

/// Haversine distance in meters between two positions given in degrees.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = (lon2 - lon1).to_radians();
    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * WGS84_A * h.sqrt().min(1.0).asin()
}

/// Initial bearing in degrees from the first position to the second, measured
/// clockwise from north and normalized to `[0, 360)`.
pub fn bearing_degrees(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lambda = (lon2 - lon1).to_radians();
    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Position reached by travelling `distance` meters from the start along the
/// given initial bearing (degrees clockwise from north).
pub fn destination(lat: f64, lon: f64, bearing: f64, distance: f64) -> GeoCoordinate {
    let phi1 = lat.to_radians();
    let lambda1 = lon.to_radians();
    let theta = bearing.to_radians();
    let delta = distance / WGS84_A;

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);
    let lon2 = (lambda2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    GeoCoordinate::new(phi2.to_degrees(), lon2, 0.0)
}
