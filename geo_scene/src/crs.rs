//! EPSG identifiers for the geographic and UTM frames a scene is built from.
//!
//! With the `proj` feature enabled, points can be transformed through PROJ,
//! which serves as an independent check of the native UTM series.

use std::fmt;

use crate::config::{Hemisphere, SceneOrigin};
use crate::utm;

const WGS84_EPSG: u32 = 4326;
const UTM_NORTH_BASE: u32 = 32600;
const UTM_SOUTH_BASE: u32 = 32700;

/// A WGS84-based frame identified by its EPSG code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crs {
    /// Latitude and longitude in degrees.
    Geographic,
    /// One UTM zone and hemisphere, in meters.
    Utm { zone: u8, hemisphere: Hemisphere },
}

impl Crs {
    pub fn wgs84() -> Self {
        Crs::Geographic
    }

    /// UTM zone frame; out-of-range zones are clamped to 1..=60.
    pub fn utm(zone: u8, hemisphere: Hemisphere) -> Self {
        Crs::Utm {
            zone: utm::clamp_zone(zone),
            hemisphere,
        }
    }

    /// Frame the scene origin's projected coordinates are expressed in.
    pub fn for_origin(origin: &SceneOrigin) -> Self {
        Self::utm(origin.utm_zone, origin.utm_hemisphere)
    }

    /// 4326 for geographic, 326zz north and 327zz south for UTM.
    pub fn epsg(&self) -> u32 {
        match *self {
            Crs::Geographic => WGS84_EPSG,
            Crs::Utm { zone, hemisphere } => {
                let base = match hemisphere {
                    Hemisphere::North => UTM_NORTH_BASE,
                    Hemisphere::South => UTM_SOUTH_BASE,
                };
                base + u32::from(zone)
            }
        }
    }

    /// Projects `(lon, lat)` or unprojects `(easting, northing)` through PROJ.
    /// `None` when PROJ cannot build or run the operation.
    #[cfg(feature = "proj")]
    pub fn transform_point(&self, target: &Crs, x: f64, y: f64) -> Option<(f64, f64)> {
        let from = self.to_string();
        let to = target.to_string();
        let proj = proj::Proj::new_known_crs(&from, &to, None).ok()?;
        proj.convert((x, y)).ok()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utm_epsg_codes() {
        assert_eq!(Crs::utm(17, Hemisphere::North).epsg(), 32617);
        assert_eq!(Crs::utm(56, Hemisphere::South).epsg(), 32756);
        assert_eq!(Crs::utm(75, Hemisphere::North).to_string(), "EPSG:32660");
        assert_eq!(Crs::utm(0, Hemisphere::South).epsg(), 32701);
        assert_eq!(Crs::for_origin(&SceneOrigin::default()).epsg(), 32617);
        assert_eq!(Crs::wgs84().to_string(), "EPSG:4326");
    }
}
