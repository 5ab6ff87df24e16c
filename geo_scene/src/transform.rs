//! Conversion between WGS84, UTM and the local scene frame.

use log::{debug, warn};

use crate::config::{Hemisphere, SceneConfig};
use crate::crs::Crs;
use crate::geodesy;
use crate::geometry::{GeoCoordinate, SceneCoordinate, UtmCoordinate};
use crate::utm;

/// Converts geographic coordinates to a local tangent plane anchored at the
/// configured origin, and back.
///
/// The meters-per-degree factors for the origin latitude are computed once in
/// [`CoordinateTransformer::new`] and reused by every conversion. Scene `x`
/// points east, `y` north and `z` up.
#[derive(Debug, Clone)]
pub struct CoordinateTransformer {
    config: SceneConfig,
    origin_lat_rad: f64,
    origin_lon_rad: f64,
    meters_per_degree_latitude: f64,
    meters_per_degree_longitude: f64,
    origin_utm: UtmCoordinate,
}

impl CoordinateTransformer {
    pub fn new(mut config: SceneConfig) -> Self {
        if !config.scale.is_finite() || config.scale <= 0.0 {
            warn!("invalid scene scale {}, using 1.0", config.scale);
            config.scale = 1.0;
        }
        let zone = utm::clamp_zone(config.origin.utm_zone);
        if zone != config.origin.utm_zone {
            warn!(
                "UTM zone {} outside 1..=60, clamped to {}",
                config.origin.utm_zone, zone
            );
            config.origin.utm_zone = zone;
        }

        let origin_lat_rad = config.origin.latitude.to_radians();
        let origin_lon_rad = config.origin.longitude.to_radians();
        let meters_per_degree_latitude = 111_132.92 - 559.82 * (2.0 * origin_lat_rad).cos()
            + 1.175 * (4.0 * origin_lat_rad).cos();
        let meters_per_degree_longitude = 111_412.84 * origin_lat_rad.cos()
            - 93.5 * (3.0 * origin_lat_rad).cos()
            + 0.118 * (5.0 * origin_lat_rad).cos();
        let origin_utm = utm::geo_to_utm(config.origin.latitude, config.origin.longitude, zone);

        debug!(
            "transformer for {}: {:.3} m/deg lat, {:.3} m/deg lon, utm {:.2}E {:.2}N zone {}{}",
            config.origin.name,
            meters_per_degree_latitude,
            meters_per_degree_longitude,
            origin_utm.easting,
            origin_utm.northing,
            origin_utm.zone,
            origin_utm.hemisphere.as_char()
        );

        Self {
            config,
            origin_lat_rad,
            origin_lon_rad,
            meters_per_degree_latitude,
            meters_per_degree_longitude,
            origin_utm,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn meters_per_degree_latitude(&self) -> f64 {
        self.meters_per_degree_latitude
    }

    pub fn meters_per_degree_longitude(&self) -> f64 {
        self.meters_per_degree_longitude
    }

    /// Origin latitude and longitude in radians.
    pub fn origin_radians(&self) -> (f64, f64) {
        (self.origin_lat_rad, self.origin_lon_rad)
    }

    /// UTM position of the scene origin in the configured zone.
    pub fn origin_utm(&self) -> UtmCoordinate {
        self.origin_utm
    }

    /// UTM frame of the configured origin.
    pub fn origin_crs(&self) -> Crs {
        Crs::for_origin(&self.config.origin)
    }

    /// Converts a geographic position to scene space. Without an elevation the
    /// raw height is zero; with [`SceneConfig::flatten_to_plane`] set, `z` is
    /// always exactly `z_offset`.
    pub fn geo_to_scene(&self, lat: f64, lon: f64, elevation: Option<f64>) -> SceneCoordinate {
        let cfg = &self.config;
        let east = (lon - cfg.origin.longitude) * self.meters_per_degree_longitude;
        let north = (lat - cfg.origin.latitude) * self.meters_per_degree_latitude;
        let z = if cfg.flatten_to_plane {
            cfg.z_offset
        } else {
            let raw = elevation.map_or(0.0, |e| e - cfg.origin.elevation);
            raw * cfg.scale + cfg.z_offset
        };
        SceneCoordinate::new(east * cfg.scale, north * cfg.scale, z)
    }

    /// Converts every coordinate, preserving order. Each coordinate's
    /// elevation is used as given.
    pub fn geo_to_scene_batch(&self, coords: &[GeoCoordinate]) -> Vec<SceneCoordinate> {
        coords
            .iter()
            .map(|c| self.geo_to_scene(c.latitude, c.longitude, Some(c.elevation)))
            .collect()
    }

    /// Exact inverse of [`geo_to_scene`](Self::geo_to_scene).
    pub fn scene_to_geo(&self, x: f64, y: f64, z: f64) -> GeoCoordinate {
        let cfg = &self.config;
        let east = x / cfg.scale;
        let north = y / cfg.scale;
        let latitude = cfg.origin.latitude + north / self.meters_per_degree_latitude;
        let longitude = cfg.origin.longitude + east / self.meters_per_degree_longitude;
        let elevation = (z - cfg.z_offset) / cfg.scale + cfg.origin.elevation;
        GeoCoordinate::new(latitude, longitude, elevation)
    }

    pub fn geo_to_utm(&self, lat: f64, lon: f64, zone: u8) -> UtmCoordinate {
        utm::geo_to_utm(lat, lon, zone)
    }

    /// Projects into the zone configured on the scene origin.
    pub fn geo_to_utm_auto(&self, lat: f64, lon: f64) -> UtmCoordinate {
        utm::geo_to_utm(lat, lon, self.config.origin.utm_zone)
    }

    pub fn utm_to_geo(
        &self,
        easting: f64,
        northing: f64,
        zone: u8,
        hemisphere: Hemisphere,
    ) -> GeoCoordinate {
        utm::utm_to_geo(easting, northing, zone, hemisphere)
    }

    /// Maps a UTM position in the configured zone straight into scene space.
    pub fn utm_to_scene(&self, easting: f64, northing: f64) -> SceneCoordinate {
        let origin = &self.config.origin;
        let geo = utm::utm_to_geo(easting, northing, origin.utm_zone, origin.utm_hemisphere);
        self.geo_to_scene(geo.latitude, geo.longitude, None)
    }

    pub fn distance_meters(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        geodesy::distance_meters(lat1, lon1, lat2, lon2)
    }

    pub fn bearing_degrees(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        geodesy::bearing_degrees(lat1, lon1, lat2, lon2)
    }
}

impl Default for CoordinateTransformer {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_zero() {
        let t = CoordinateTransformer::default();
        let p = t.geo_to_scene(35.2271, -80.8431, None);
        assert_eq!(p, SceneCoordinate::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn round_trip() {
        let cfg = SceneConfig::default()
            .with_scale(2.0)
            .with_z_offset(5.0)
            .with_flatten_to_plane(false);
        let t = CoordinateTransformer::new(cfg);
        let p = t.geo_to_scene(35.23, -80.84, Some(250.0));
        let back = t.scene_to_geo(p.x, p.y, p.z);
        assert!((back.latitude - 35.23).abs() < 1e-10);
        assert!((back.longitude + 80.84).abs() < 1e-10);
        assert!((back.elevation - 250.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_config_is_clamped() {
        let mut cfg = SceneConfig::default().with_scale(0.0);
        cfg.origin.utm_zone = 0;
        let t = CoordinateTransformer::new(cfg);
        assert_eq!(t.config().scale, 1.0);
        assert_eq!(t.config().origin.utm_zone, 1);
    }
}
