//! Scene configuration: reference origin, scale and unit policy.

use serde::{Deserialize, Serialize};

use crate::utm;

/// Hemisphere of a UTM zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Hemisphere {
    #[default]
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
}

impl Hemisphere {
    /// Hemisphere containing the given latitude. The equator counts as north.
    pub fn from_latitude(latitude: f64) -> Self {
        if latitude < 0.0 {
            Hemisphere::South
        } else {
            Hemisphere::North
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        }
    }
}

/// Anchor of the local tangent plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOrigin {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in meters mapped to `z = 0` before the offset is applied.
    pub elevation: f64,
    pub name: String,
    pub utm_zone: u8,
    pub utm_hemisphere: Hemisphere,
}

impl SceneOrigin {
    /// Creates an origin, deriving the UTM zone and hemisphere from the
    /// coordinates.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
            name: name.into(),
            utm_zone: utm::zone_for_longitude(longitude),
            utm_hemisphere: Hemisphere::from_latitude(latitude),
        }
    }
}

impl Default for SceneOrigin {
    fn default() -> Self {
        Self {
            latitude: 35.2271,
            longitude: -80.8431,
            elevation: 230.0,
            name: "Charlotte".to_string(),
            utm_zone: 17,
            utm_hemisphere: Hemisphere::North,
        }
    }
}

/// Complete scene configuration shared by the transformer and the road
/// network processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub origin: SceneOrigin,
    /// Multiplier applied to every scene axis.
    pub scale: f64,
    /// Added to `z` after scaling.
    pub z_offset: f64,
    /// Discard elevation so that every point lies on `z = z_offset`.
    pub flatten_to_plane: bool,
    /// Road width in meters used when neither tags nor the type table supply one.
    pub default_road_width: f64,
    /// Lane count used when neither tags nor the type table supply one.
    pub default_lane_count: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            origin: SceneOrigin::default(),
            scale: 1.0,
            z_offset: 0.0,
            flatten_to_plane: true,
            default_road_width: 7.0,
            default_lane_count: 2,
        }
    }
}

impl SceneConfig {
    pub fn new(origin: SceneOrigin) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    pub fn with_origin(mut self, origin: SceneOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_z_offset(mut self, z_offset: f64) -> Self {
        self.z_offset = z_offset;
        self
    }

    pub fn with_flatten_to_plane(mut self, flatten: bool) -> Self {
        self.flatten_to_plane = flatten;
        self
    }

    /// Saves this configuration to a JSON file.
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        crate::io::write_string(path, &json)
    }

    /// Loads a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn load(path: &str) -> std::io::Result<Self> {
        let data = crate::io::read_to_string(path)?;
        let config: SceneConfig = serde_json::from_str(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_derives_zone() {
        let origin = SceneOrigin::new("Sydney", -33.8688, 151.2093, 58.0);
        assert_eq!(origin.utm_zone, 56);
        assert_eq!(origin.utm_hemisphere, Hemisphere::South);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let path = path.to_str().unwrap();
        let config = SceneConfig::default()
            .with_scale(0.5)
            .with_flatten_to_plane(false);
        config.save(path).unwrap();
        let loaded = SceneConfig::load(path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: SceneConfig =
            serde_json::from_str(r#"{"scale": 2.0, "origin": {"utm_hemisphere": "S"}}"#).unwrap();
        assert_eq!(cfg.scale, 2.0);
        assert_eq!(cfg.origin.utm_hemisphere, Hemisphere::South);
        assert_eq!(cfg.origin.utm_zone, 17);
        assert_eq!(cfg.default_lane_count, 2);
        assert!(cfg.flatten_to_plane);
    }
}
