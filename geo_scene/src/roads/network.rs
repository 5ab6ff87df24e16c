//! Processed road network and the read-only queries over it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{
    Intersection, RoadNode, RoadSegment, RoadType, HIGHWAY_TYPES, LOCAL_ROAD_TYPES,
    MAJOR_ROAD_TYPES,
};
use crate::geometry::SceneBounds;

/// Ingestion diagnostics for one processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub nodes_resolved: usize,
    pub ways_seen: usize,
    /// Ways without a `highway` tag.
    pub non_road_ways: usize,
    /// Road ways with fewer than two resolvable coordinates.
    pub dropped_ways: usize,
    /// Node references in road ways that had no matching node.
    pub missing_node_refs: usize,
}

/// Aggregate figures computed from a [`RoadNetwork`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub segment_count: usize,
    pub node_count: usize,
    pub intersection_count: usize,
    pub total_length: f64,
    pub bridge_count: usize,
    pub tunnel_count: usize,
    pub oneway_count: usize,
    pub named_count: usize,
    pub by_type: BTreeMap<RoadType, usize>,
    pub report: ProcessingReport,
}

/// Output of a processing run: nodes, segments and intersections, each
/// ordered by ascending id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadNetwork {
    pub nodes: Vec<RoadNode>,
    pub segments: Vec<RoadSegment>,
    pub intersections: Vec<Intersection>,
    pub report: ProcessingReport,
}

impl RoadNetwork {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, id: u64) -> Option<&RoadSegment> {
        self.segments
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .map(|i| &self.segments[i])
    }

    pub fn node(&self, id: u64) -> Option<&RoadNode> {
        self.nodes
            .binary_search_by_key(&id, |n| n.id)
            .ok()
            .map(|i| &self.nodes[i])
    }

    pub fn intersection_at(&self, node_id: u64) -> Option<&Intersection> {
        self.intersections
            .binary_search_by_key(&node_id, |i| i.node_id)
            .ok()
            .map(|i| &self.intersections[i])
    }

    /// Segments whose type is in `types`.
    pub fn filter_by_type(&self, types: &[RoadType]) -> Vec<&RoadSegment> {
        let wanted: BTreeSet<RoadType> = types.iter().copied().collect();
        self.segments
            .iter()
            .filter(|s| wanted.contains(&s.road_type))
            .collect()
    }

    /// Segments with at least one coordinate inside the rectangle (edges
    /// inclusive).
    pub fn filter_by_bounding_box(
        &self,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    ) -> Vec<&RoadSegment> {
        let bounds = SceneBounds::new(min_x, min_y, max_x, max_y);
        self.segments
            .iter()
            .filter(|s| s.coordinates.iter().any(|c| bounds.contains(c.x, c.y)))
            .collect()
    }

    /// Named segments whose name contains `text`, ignoring case.
    pub fn find_by_name_substring(&self, text: &str) -> Vec<&RoadSegment> {
        let needle = text.to_lowercase();
        self.segments
            .iter()
            .filter(|s| {
                s.name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn highways(&self) -> Vec<&RoadSegment> {
        self.filter_by_type(&HIGHWAY_TYPES)
    }

    pub fn major_roads(&self) -> Vec<&RoadSegment> {
        self.filter_by_type(&MAJOR_ROAD_TYPES)
    }

    pub fn local_roads(&self) -> Vec<&RoadSegment> {
        self.filter_by_type(&LOCAL_ROAD_TYPES)
    }

    /// Horizontal extent of all segment coordinates.
    pub fn bounds(&self) -> Option<SceneBounds> {
        SceneBounds::from_coordinates(self.segments.iter().flat_map(|s| s.coordinates.iter()))
    }

    /// Segment connectivity: each segment id maps to the other segments it
    /// meets at an intersection. Segments without neighbours map to an empty
    /// set.
    pub fn adjacency(&self) -> BTreeMap<u64, BTreeSet<u64>> {
        let mut graph: BTreeMap<u64, BTreeSet<u64>> =
            self.segments.iter().map(|s| (s.id, BTreeSet::new())).collect();
        for inter in &self.intersections {
            for &a in &inter.segment_ids {
                let neighbours = graph.entry(a).or_default();
                neighbours.extend(inter.segment_ids.iter().copied().filter(|&b| b != a));
            }
        }
        graph
    }

    /// Computes aggregate statistics in a single pass over the segments.
    pub fn stats(&self) -> NetworkStats {
        let mut stats = NetworkStats {
            node_count: self.nodes.len(),
            intersection_count: self.intersections.len(),
            report: self.report,
            ..NetworkStats::default()
        };
        for seg in &self.segments {
            stats.segment_count += 1;
            stats.total_length += seg.length();
            stats.bridge_count += usize::from(seg.is_bridge);
            stats.tunnel_count += usize::from(seg.is_tunnel);
            stats.oneway_count += usize::from(seg.is_oneway);
            stats.named_count += usize::from(seg.name.is_some());
            *stats.by_type.entry(seg.road_type).or_insert(0) += 1;
        }
        stats
    }
}
