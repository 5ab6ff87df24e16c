//! Core library turning WGS84 survey data into a local Cartesian scene and a
//! connected road network graph.

pub mod config;
pub mod crs;
pub mod geodesy;
pub mod geometry;
pub mod io;
pub mod roads;
pub mod transform;
pub mod utm;

pub use config::{Hemisphere, SceneConfig, SceneOrigin};
pub use geometry::{GeoCoordinate, SceneBounds, SceneCoordinate, UtmCoordinate};
pub use roads::{
    Intersection, NetworkStats, NodeSource, OsmData, RoadNetwork, RoadNetworkProcessor, RoadNode,
    RoadSegment, RoadType, Tags, WaySource,
};
pub use transform::CoordinateTransformer;
