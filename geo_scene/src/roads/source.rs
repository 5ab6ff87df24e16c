//! Input interfaces implemented by whatever retrieves the raw OSM data.

use std::collections::HashMap;

use super::tags::Tags;

/// A geographic node as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawNode {
    pub lat: f64,
    pub lon: f64,
    pub tags: Tags,
}

impl RawNode {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            tags: Tags::new(),
        }
    }
}

/// A way: ordered node references plus tags.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawWay {
    pub tags: Tags,
    pub node_ids: Vec<u64>,
}

impl RawWay {
    pub fn new(tags: Tags, node_ids: Vec<u64>) -> Self {
        Self { tags, node_ids }
    }
}

/// Read access to a collection of nodes keyed by id.
pub trait NodeSource {
    fn nodes(&self) -> Box<dyn Iterator<Item = (u64, &RawNode)> + '_>;

    fn node_count(&self) -> usize {
        self.nodes().count()
    }
}

/// Read access to a collection of ways keyed by id.
pub trait WaySource {
    fn ways(&self) -> Box<dyn Iterator<Item = (u64, &RawWay)> + '_>;

    fn way_count(&self) -> usize {
        self.ways().count()
    }
}

/// In-memory node and way maps.
#[derive(Debug, Clone, Default)]
pub struct OsmData {
    pub nodes: HashMap<u64, RawNode>,
    pub ways: HashMap<u64, RawWay>,
}

impl OsmData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: u64, node: RawNode) {
        self.nodes.insert(id, node);
    }

    pub fn add_way(&mut self, id: u64, way: RawWay) {
        self.ways.insert(id, way);
    }
}

impl NodeSource for OsmData {
    fn nodes(&self) -> Box<dyn Iterator<Item = (u64, &RawNode)> + '_> {
        Box::new(self.nodes.iter().map(|(id, n)| (*id, n)))
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl WaySource for OsmData {
    fn ways(&self) -> Box<dyn Iterator<Item = (u64, &RawWay)> + '_> {
        Box::new(self.ways.iter().map(|(id, w)| (*id, w)))
    }

    fn way_count(&self) -> usize {
        self.ways.len()
    }
}
