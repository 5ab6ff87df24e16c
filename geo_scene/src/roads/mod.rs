//! Road network graph built from tagged ways and nodes.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::geometry::{self, SceneCoordinate};

pub mod index;
pub mod network;
pub mod processor;
pub mod source;
pub mod tags;

pub use network::{NetworkStats, ProcessingReport, RoadNetwork};
pub use processor::{ProcessingStage, RoadNetworkProcessor};
pub use source::{NodeSource, OsmData, RawNode, RawWay, WaySource};
pub use tags::Tags;

/// Classification of a road taken from the OSM `highway` tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    Motorway,
    MotorwayLink,
    Trunk,
    TrunkLink,
    Primary,
    PrimaryLink,
    Secondary,
    SecondaryLink,
    Tertiary,
    TertiaryLink,
    Residential,
    LivingStreet,
    Service,
    Unclassified,
    Track,
    Pedestrian,
    Footway,
    Cycleway,
    Path,
    Steps,
}

impl RoadType {
    pub const ALL: [RoadType; 20] = [
        RoadType::Motorway,
        RoadType::MotorwayLink,
        RoadType::Trunk,
        RoadType::TrunkLink,
        RoadType::Primary,
        RoadType::PrimaryLink,
        RoadType::Secondary,
        RoadType::SecondaryLink,
        RoadType::Tertiary,
        RoadType::TertiaryLink,
        RoadType::Residential,
        RoadType::LivingStreet,
        RoadType::Service,
        RoadType::Unclassified,
        RoadType::Track,
        RoadType::Pedestrian,
        RoadType::Footway,
        RoadType::Cycleway,
        RoadType::Path,
        RoadType::Steps,
    ];

    /// Parses a `highway` value. Unknown values map to `Unclassified`.
    pub fn from_highway(value: &str) -> Self {
        match value.trim() {
            "motorway" => RoadType::Motorway,
            "motorway_link" => RoadType::MotorwayLink,
            "trunk" => RoadType::Trunk,
            "trunk_link" => RoadType::TrunkLink,
            "primary" => RoadType::Primary,
            "primary_link" => RoadType::PrimaryLink,
            "secondary" => RoadType::Secondary,
            "secondary_link" => RoadType::SecondaryLink,
            "tertiary" => RoadType::Tertiary,
            "tertiary_link" => RoadType::TertiaryLink,
            "residential" => RoadType::Residential,
            "living_street" => RoadType::LivingStreet,
            "service" => RoadType::Service,
            "track" => RoadType::Track,
            "pedestrian" => RoadType::Pedestrian,
            "footway" => RoadType::Footway,
            "cycleway" => RoadType::Cycleway,
            "path" => RoadType::Path,
            "steps" => RoadType::Steps,
            _ => RoadType::Unclassified,
        }
    }

    /// OSM tag value for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoadType::Motorway => "motorway",
            RoadType::MotorwayLink => "motorway_link",
            RoadType::Trunk => "trunk",
            RoadType::TrunkLink => "trunk_link",
            RoadType::Primary => "primary",
            RoadType::PrimaryLink => "primary_link",
            RoadType::Secondary => "secondary",
            RoadType::SecondaryLink => "secondary_link",
            RoadType::Tertiary => "tertiary",
            RoadType::TertiaryLink => "tertiary_link",
            RoadType::Residential => "residential",
            RoadType::LivingStreet => "living_street",
            RoadType::Service => "service",
            RoadType::Unclassified => "unclassified",
            RoadType::Track => "track",
            RoadType::Pedestrian => "pedestrian",
            RoadType::Footway => "footway",
            RoadType::Cycleway => "cycleway",
            RoadType::Path => "path",
            RoadType::Steps => "steps",
        }
    }

    /// Width in meters and lane count from the per-type table, if the type
    /// has an entry.
    pub fn default_dimensions(&self) -> Option<RoadDimensions> {
        ROAD_DEFAULTS.get(self).copied()
    }
}

impl fmt::Display for RoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical defaults for a road type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadDimensions {
    pub width: f64,
    pub lanes: u32,
}

static ROAD_DEFAULTS: Lazy<HashMap<RoadType, RoadDimensions>> = Lazy::new(|| {
    use RoadType::*;
    [
        (Motorway, 25.0, 6),
        (MotorwayLink, 8.0, 1),
        (Trunk, 20.0, 4),
        (TrunkLink, 8.0, 1),
        (Primary, 15.0, 4),
        (PrimaryLink, 7.0, 1),
        (Secondary, 12.0, 2),
        (SecondaryLink, 7.0, 1),
        (Tertiary, 10.0, 2),
        (TertiaryLink, 6.0, 1),
        (Residential, 7.0, 2),
        (LivingStreet, 5.0, 1),
        (Service, 4.0, 1),
        (Pedestrian, 5.0, 0),
        (Footway, 2.0, 0),
        (Cycleway, 2.0, 1),
        (Path, 1.5, 0),
        (Steps, 2.0, 0),
    ]
    .into_iter()
    .map(|(ty, width, lanes)| (ty, RoadDimensions { width, lanes }))
    .collect()
});

/// Controlled-access roads.
pub const HIGHWAY_TYPES: [RoadType; 4] = [
    RoadType::Motorway,
    RoadType::MotorwayLink,
    RoadType::Trunk,
    RoadType::TrunkLink,
];

/// Arterial and collector roads.
pub const MAJOR_ROAD_TYPES: [RoadType; 6] = [
    RoadType::Primary,
    RoadType::PrimaryLink,
    RoadType::Secondary,
    RoadType::SecondaryLink,
    RoadType::Tertiary,
    RoadType::TertiaryLink,
];

/// Neighbourhood streets.
pub const LOCAL_ROAD_TYPES: [RoadType; 4] = [
    RoadType::Residential,
    RoadType::LivingStreet,
    RoadType::Service,
    RoadType::Unclassified,
];

/// A network node with its position in scene space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadNode {
    pub id: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub scene_position: SceneCoordinate,
    /// Distinct ids of the segments passing through this node, in ascending
    /// segment id order. Filled during intersection detection.
    pub connected_segment_ids: Vec<u64>,
}

impl RoadNode {
    pub fn is_intersection(&self) -> bool {
        self.connected_segment_ids.len() >= 2
    }
}

/// A road way resolved into scene space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub id: u64,
    pub name: Option<String>,
    pub road_type: RoadType,
    pub coordinates: Vec<SceneCoordinate>,
    pub width: f64,
    pub lane_count: u32,
    pub surface: String,
    pub is_bridge: bool,
    pub is_tunnel: bool,
    pub is_oneway: bool,
    pub tags: Tags,
}

impl RoadSegment {
    /// Sum of the straight-line distances between consecutive coordinates.
    pub fn length(&self) -> f64 {
        geometry::polyline_length(&self.coordinates)
    }

    /// Centerline in the horizontal scene plane.
    pub fn to_line_string(&self) -> geo_types::LineString<f64> {
        self.coordinates
            .iter()
            .map(|c| geo_types::Coord::from(*c))
            .collect()
    }

    pub fn start(&self) -> Option<&SceneCoordinate> {
        self.coordinates.first()
    }

    pub fn end(&self) -> Option<&SceneCoordinate> {
        self.coordinates.last()
    }
}

/// A node shared by at least two distinct segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub node_id: u64,
    pub position: SceneCoordinate,
    pub segment_ids: BTreeSet<u64>,
    pub road_types: BTreeSet<RoadType>,
}

impl Intersection {
    /// Number of segments meeting at this intersection.
    pub fn degree(&self) -> usize {
        self.segment_ids.len()
    }
}
