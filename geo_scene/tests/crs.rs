#![cfg(feature = "proj")]

use geo_scene::crs::Crs;
use geo_scene::utm::geo_to_utm;
use geo_scene::Hemisphere;

#[test]
fn native_utm_matches_proj() {
    let wgs84 = Crs::wgs84();
    let zone17 = Crs::utm(17, Hemisphere::North);
    for (lat, lon) in [(35.2271, -80.8431), (35.7796, -78.6382), (33.0, -83.5)] {
        let (e, n) = wgs84.transform_point(&zone17, lon, lat).unwrap();
        let native = geo_to_utm(lat, lon, 17);
        assert!((native.easting - e).abs() < 0.05);
        assert!((native.northing - n).abs() < 0.05);
    }
}
