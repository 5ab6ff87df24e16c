//! Universal Transverse Mercator projection on the WGS84 ellipsoid.
//!
//! The forward and inverse mappings use the classic series expansion
//! (Snyder, *Map Projections: A Working Manual*, §8) carried to sixth order in
//! the longitude offset. Accuracy is at the millimetre level inside a zone and
//! degrades outside roughly ±85° latitude; out of range input is accepted
//! without error.

use crate::config::Hemisphere;
use crate::geometry::{GeoCoordinate, UtmCoordinate};

/// WGS84 semi-major axis in meters.
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// Scale factor on the central meridian.
pub const K0: f64 = 0.9996;
pub const FALSE_EASTING: f64 = 500_000.0;
/// Added to the northing of southern hemisphere coordinates.
pub const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Clamps `zone` into the valid range `1..=60`.
pub fn clamp_zone(zone: u8) -> u8 {
    zone.clamp(1, 60)
}

/// Zone number containing the given longitude in degrees.
pub fn zone_for_longitude(longitude: f64) -> u8 {
    if !longitude.is_finite() {
        return 1;
    }
    let wrapped = (longitude + 180.0).rem_euclid(360.0);
    let zone = (wrapped / 6.0).floor() as i64 + 1;
    if longitude == 180.0 {
        return 60;
    }
    zone.clamp(1, 60) as u8
}

/// Longitude in degrees of the central meridian of `zone`.
pub fn central_meridian(zone: u8) -> f64 {
    f64::from(clamp_zone(zone)) * 6.0 - 183.0
}

fn eccentricity_squared() -> f64 {
    WGS84_F * (2.0 - WGS84_F)
}

/// Meridional arc length from the equator to latitude `phi` (radians).
fn meridional_arc(phi: f64) -> f64 {
    let e2 = eccentricity_squared();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

/// Projects a geographic position into the given zone. The hemisphere follows
/// the sign of `latitude`.
pub fn geo_to_utm(latitude: f64, longitude: f64, zone: u8) -> UtmCoordinate {
    let zone = clamp_zone(zone);
    let e2 = eccentricity_squared();
    let ep2 = e2 / (1.0 - e2);

    let phi = latitude.to_radians();
    let lambda = longitude.to_radians();
    let lambda0 = central_meridian(zone).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let tan_phi = phi.tan();
    let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = cos_phi * (lambda - lambda0);
    let m = meridional_arc(phi);

    let easting = K0
        * n
        * (a + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
        + FALSE_EASTING;
    let mut northing = K0
        * (m + n
            * tan_phi
            * (a * a / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));

    let hemisphere = Hemisphere::from_latitude(latitude);
    if hemisphere == Hemisphere::South {
        northing += FALSE_NORTHING_SOUTH;
    }

    UtmCoordinate {
        easting,
        northing,
        zone,
        hemisphere,
    }
}

/// Inverse projection using the footpoint latitude expansion. The returned
/// elevation is always zero.
pub fn utm_to_geo(easting: f64, northing: f64, zone: u8, hemisphere: Hemisphere) -> GeoCoordinate {
    let zone = clamp_zone(zone);
    let e2 = eccentricity_squared();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let ep2 = e2 / (1.0 - e2);

    let x = easting - FALSE_EASTING;
    let y = match hemisphere {
        Hemisphere::North => northing,
        Hemisphere::South => northing - FALSE_NORTHING_SOUTH,
    };

    let m = y / K0;
    let mu = m / (WGS84_A * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
    let sqrt_1me2 = (1.0 - e2).sqrt();
    let e1 = (1.0 - sqrt_1me2) / (1.0 + sqrt_1me2);

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let tan_phi1 = phi1.tan();
    let denom = 1.0 - e2 * sin_phi1 * sin_phi1;
    let n1 = WGS84_A / denom.sqrt();
    let t1 = tan_phi1 * tan_phi1;
    let c1 = ep2 * cos_phi1 * cos_phi1;
    let r1 = WGS84_A * (1.0 - e2) / denom.powf(1.5);
    let d = x / (n1 * K0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d * d / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);
    let lon = central_meridian(zone).to_radians()
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                * d.powi(5)
                / 120.0)
            / cos_phi1;

    GeoCoordinate::new(lat.to_degrees(), lon.to_degrees(), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_numbers() {
        assert_eq!(zone_for_longitude(-80.8431), 17);
        assert_eq!(zone_for_longitude(-180.0), 1);
        assert_eq!(zone_for_longitude(180.0), 60);
        assert_eq!(zone_for_longitude(151.2093), 56);
        assert_eq!(zone_for_longitude(f64::NAN), 1);
        assert_eq!(central_meridian(17), -81.0);
        assert_eq!(central_meridian(0), -177.0);
        assert_eq!(clamp_zone(99), 60);
    }

    #[test]
    fn central_meridian_on_equator() {
        let utm = geo_to_utm(0.0, -81.0, 17);
        assert!((utm.easting - 500_000.0).abs() < 1e-6);
        assert!(utm.northing.abs() < 1e-6);
        assert_eq!(utm.hemisphere, Hemisphere::North);
    }

    #[test]
    fn charlotte_reference_values() {
        let utm = geo_to_utm(35.2271, -80.8431, 17);
        assert!((utm.easting - 514_277.72).abs() < 0.05);
        assert!((utm.northing - 3_898_239.34).abs() < 0.05);
    }
}
