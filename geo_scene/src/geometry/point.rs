//! Coordinate value types shared by the transformer and the road network.

use crate::config::Hemisphere;

/// WGS84 geographic position in degrees with elevation in meters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }
}

impl From<GeoCoordinate> for geo_types::Coord<f64> {
    fn from(c: GeoCoordinate) -> Self {
        geo_types::coord! { x: c.longitude, y: c.latitude }
    }
}

impl From<GeoCoordinate> for geo_types::Point<f64> {
    fn from(c: GeoCoordinate) -> Self {
        geo_types::Point::new(c.longitude, c.latitude)
    }
}

/// Projected position inside a single UTM zone, in meters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UtmCoordinate {
    pub easting: f64,
    pub northing: f64,
    pub zone: u8,
    pub hemisphere: Hemisphere,
}

/// Position in scene space: meters east (`x`), north (`y`) and up (`z`) of the
/// scene origin, after scale and offset are applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct SceneCoordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SceneCoordinate {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other` in all three axes.
    pub fn distance(&self, other: &SceneCoordinate) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2) + (other.z - self.z).powi(2))
            .sqrt()
    }

    /// Euclidean distance to `other` ignoring the vertical axis.
    pub fn distance_2d(&self, other: &SceneCoordinate) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

impl From<SceneCoordinate> for geo_types::Coord<f64> {
    fn from(c: SceneCoordinate) -> Self {
        geo_types::coord! { x: c.x, y: c.y }
    }
}
