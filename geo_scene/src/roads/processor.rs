//! Staged construction of a [`RoadNetwork`] from raw nodes and ways.
//!
//! A run moves through [`ProcessingStage`] in order. Node resolution, segment
//! construction and the per-segment half of intersection detection run on the
//! rayon pool; results are merged sequentially in ascending id order, so the
//! output does not depend on scheduling.

use std::collections::{BTreeSet, HashMap};

use log::{debug, info, warn};
use rayon::prelude::*;

use super::index::SpatialGrid;
use super::network::RoadNetwork;
use super::source::{NodeSource, RawNode, RawWay, WaySource};
use super::tags::Tags;
use super::{Intersection, RoadNode, RoadSegment, RoadType};
use crate::config::SceneConfig;
use crate::geometry::SceneCoordinate;
use crate::transform::CoordinateTransformer;

/// Default coincidence tolerance for intersection detection, in scene units.
pub const DEFAULT_INTERSECTION_EPSILON: f64 = 0.01;

/// Progress of the current processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ProcessingStage {
    #[default]
    Reset,
    NodesResolved,
    SegmentsBuilt,
    IntersectionsDetected,
    Ready,
}

/// Builds road segments, nodes and intersections from tagged OSM input.
///
/// Only configuration survives between runs; each [`process`](Self::process)
/// call starts from an empty network.
#[derive(Debug, Clone)]
pub struct RoadNetworkProcessor {
    transformer: CoordinateTransformer,
    epsilon: f64,
    stage: ProcessingStage,
    node_index: HashMap<u64, usize>,
    road_nodes: BTreeSet<usize>,
    network: RoadNetwork,
}

impl RoadNetworkProcessor {
    pub fn new(transformer: CoordinateTransformer) -> Self {
        Self {
            transformer,
            epsilon: DEFAULT_INTERSECTION_EPSILON,
            stage: ProcessingStage::Reset,
            node_index: HashMap::new(),
            road_nodes: BTreeSet::new(),
            network: RoadNetwork::default(),
        }
    }

    pub fn from_config(config: SceneConfig) -> Self {
        Self::new(CoordinateTransformer::new(config))
    }

    /// Sets the distance under which a segment coordinate is considered to
    /// touch a node. Invalid values fall back to the default.
    pub fn with_intersection_epsilon(mut self, epsilon: f64) -> Self {
        if epsilon.is_finite() && epsilon >= 0.0 {
            self.epsilon = epsilon;
        } else {
            warn!(
                "invalid intersection epsilon {}, using {}",
                epsilon, DEFAULT_INTERSECTION_EPSILON
            );
            self.epsilon = DEFAULT_INTERSECTION_EPSILON;
        }
        self
    }

    pub fn intersection_epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn transformer(&self) -> &CoordinateTransformer {
        &self.transformer
    }

    pub fn stage(&self) -> ProcessingStage {
        self.stage
    }

    /// Network produced by the stages run so far.
    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    /// Moves the network out and resets the processor.
    pub fn take_network(&mut self) -> RoadNetwork {
        let network = std::mem::take(&mut self.network);
        self.reset();
        network
    }

    /// Runs every stage over `source` and returns the finished network.
    pub fn process<S>(&mut self, source: &S) -> &RoadNetwork
    where
        S: NodeSource + WaySource + ?Sized,
    {
        self.process_sources(source, source)
    }

    /// Like [`process`](Self::process) with nodes and ways from separate
    /// sources.
    pub fn process_sources<N, W>(&mut self, nodes: &N, ways: &W) -> &RoadNetwork
    where
        N: NodeSource + ?Sized,
        W: WaySource + ?Sized,
    {
        self.reset();
        self.resolve_nodes(nodes);
        self.build_segments(ways);
        self.detect_intersections();
        self.stage = ProcessingStage::Ready;

        let report = self.network.report;
        info!(
            "road network ready: {} segments, {} intersections from {} nodes and {} ways \
             ({} non-road, {} dropped, {} missing node refs)",
            self.network.segments.len(),
            self.network.intersections.len(),
            report.nodes_resolved,
            report.ways_seen,
            report.non_road_ways,
            report.dropped_ways,
            report.missing_node_refs
        );
        &self.network
    }

    /// Clears all derived state.
    pub fn reset(&mut self) {
        self.node_index.clear();
        self.road_nodes.clear();
        self.network = RoadNetwork::default();
        self.stage = ProcessingStage::Reset;
    }

    /// Converts every input node to scene space. Nodes are stored in ascending
    /// id order; a repeated id keeps its first occurrence.
    pub fn resolve_nodes<N: NodeSource + ?Sized>(&mut self, source: &N) {
        let mut raw: Vec<(u64, &RawNode)> = source.nodes().collect();
        raw.sort_by_key(|(id, _)| *id);
        raw.dedup_by_key(|(id, _)| *id);

        let transformer = &self.transformer;
        let nodes: Vec<RoadNode> = raw
            .par_iter()
            .map(|(id, node)| RoadNode {
                id: *id,
                latitude: node.lat,
                longitude: node.lon,
                scene_position: transformer.geo_to_scene(node.lat, node.lon, None),
                connected_segment_ids: Vec::new(),
            })
            .collect();

        self.node_index = nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| (n.id, idx))
            .collect();
        self.road_nodes.clear();
        self.network.report.nodes_resolved = nodes.len();
        self.network.nodes = nodes;
        self.stage = ProcessingStage::NodesResolved;
        debug!("resolved {} nodes", self.network.nodes.len());
    }

    /// Builds the segment for one way from the resolved nodes. Returns `None`
    /// when fewer than two of the referenced nodes are known.
    pub fn build_segment(&self, way_id: u64, tags: &Tags, node_ids: &[u64]) -> Option<RoadSegment> {
        self.segment_from_way(way_id, tags, node_ids).0.map(|(segment, _)| segment)
    }

    /// Builds segments for every way carrying a `highway` tag, in ascending
    /// way id order.
    pub fn build_segments<W: WaySource + ?Sized>(&mut self, source: &W) {
        let mut raw: Vec<(u64, &RawWay)> = source.ways().collect();
        raw.sort_by_key(|(id, _)| *id);
        raw.dedup_by_key(|(id, _)| *id);

        let ways_seen = raw.len();
        raw.retain(|(_, way)| way.tags.highway().is_some());
        let non_road_ways = ways_seen - raw.len();

        let this = &*self;
        let built: Vec<(u64, Option<(RoadSegment, Vec<usize>)>, usize)> = raw
            .par_iter()
            .map(|(id, way)| {
                let (segment, missing) = this.segment_from_way(*id, &way.tags, &way.node_ids);
                (*id, segment, missing)
            })
            .collect();

        let mut segments = Vec::with_capacity(built.len());
        let mut road_nodes = BTreeSet::new();
        let mut dropped = 0;
        let mut missing_refs = 0;
        for (id, segment, missing) in built {
            missing_refs += missing;
            match segment {
                Some((seg, node_indices)) => {
                    road_nodes.extend(node_indices);
                    segments.push(seg);
                }
                None => {
                    debug!("way {} has fewer than two resolvable nodes, dropped", id);
                    dropped += 1;
                }
            }
        }
        if dropped > 0 {
            warn!(
                "dropped {} of {} road ways with fewer than two resolvable nodes",
                dropped,
                ways_seen - non_road_ways
            );
        }

        let report = &mut self.network.report;
        report.ways_seen = ways_seen;
        report.non_road_ways = non_road_ways;
        report.dropped_ways = dropped;
        report.missing_node_refs = missing_refs;
        self.network.segments = segments;
        self.road_nodes = road_nodes;
        self.stage = ProcessingStage::SegmentsBuilt;
        debug!("built {} segments", self.network.segments.len());
    }

    /// Attaches every segment to the nodes its coordinates touch and collects
    /// the nodes shared by two or more segments as intersections.
    ///
    /// Matching is by position rather than by node id. Nodes referenced by
    /// road ways that lie within the intersection epsilon of each other form
    /// one group, represented by its lowest node id, so ways ending on nearly
    /// coincident points through different ids still connect. Nodes no road
    /// references take no part.
    pub fn detect_intersections(&mut self) {
        for node in &mut self.network.nodes {
            node.connected_segment_ids.clear();
        }

        // candidate order follows node order, hence ascending id
        let candidates: Vec<usize> = self.road_nodes.iter().copied().collect();
        let positions: Vec<SceneCoordinate> = candidates
            .iter()
            .map(|&idx| self.network.nodes[idx].scene_position)
            .collect();
        let epsilon = self.epsilon;
        let grid = SpatialGrid::build(&positions, epsilon);
        let representative: Vec<usize> = grid
            .clusters(&positions, epsilon)
            .into_iter()
            .map(|root| candidates[root])
            .collect();
        debug!(
            "indexed {} road nodes into {} coincidence groups",
            candidates.len(),
            representative.iter().collect::<BTreeSet<_>>().len()
        );

        // map: per segment, the distinct node groups it touches
        let touched: Vec<BTreeSet<usize>> = self
            .network
            .segments
            .par_iter()
            .map(|seg| {
                seg.coordinates
                    .iter()
                    .filter_map(|c| grid.nearest_within(&positions, c, epsilon))
                    .map(|local| representative[local])
                    .collect::<BTreeSet<usize>>()
            })
            .collect();

        // reduce in segment order so each node lists its segments ascending
        for (seg, nodes) in self.network.segments.iter().zip(&touched) {
            for &idx in nodes {
                self.network.nodes[idx].connected_segment_ids.push(seg.id);
            }
        }

        let types_by_segment: HashMap<u64, RoadType> = self
            .network
            .segments
            .iter()
            .map(|s| (s.id, s.road_type))
            .collect();
        self.network.intersections = self
            .network
            .nodes
            .iter()
            .filter(|n| n.is_intersection())
            .map(|n| Intersection {
                node_id: n.id,
                position: n.scene_position,
                segment_ids: n.connected_segment_ids.iter().copied().collect(),
                road_types: n
                    .connected_segment_ids
                    .iter()
                    .filter_map(|id| types_by_segment.get(id).copied())
                    .collect(),
            })
            .collect();

        self.stage = ProcessingStage::IntersectionsDetected;
        debug!(
            "detected {} intersections",
            self.network.intersections.len()
        );
    }

    fn segment_from_way(
        &self,
        way_id: u64,
        tags: &Tags,
        node_ids: &[u64],
    ) -> (Option<(RoadSegment, Vec<usize>)>, usize) {
        let mut missing = 0;
        let node_indices: Vec<usize> = node_ids
            .iter()
            .filter_map(|id| {
                let idx = self.node_index.get(id).copied();
                if idx.is_none() {
                    missing += 1;
                }
                idx
            })
            .collect();
        if node_indices.len() < 2 {
            return (None, missing);
        }
        let coordinates: Vec<SceneCoordinate> = node_indices
            .iter()
            .map(|&idx| self.network.nodes[idx].scene_position)
            .collect();

        let cfg = self.transformer.config();
        let road_type = tags
            .highway()
            .map_or(RoadType::Unclassified, RoadType::from_highway);
        let defaults = road_type.default_dimensions();
        let width = tags
            .width_meters()
            .or(defaults.map(|d| d.width))
            .unwrap_or(cfg.default_road_width);
        let lane_count = tags
            .lane_count()
            .or(defaults.map(|d| d.lanes))
            .unwrap_or(cfg.default_lane_count);

        let segment = RoadSegment {
            id: way_id,
            name: tags.name().map(str::to_string),
            road_type,
            coordinates,
            width,
            lane_count,
            surface: tags.surface().to_string(),
            is_bridge: tags.is_bridge(),
            is_tunnel: tags.is_tunnel(),
            is_oneway: tags.is_oneway(),
            tags: tags.clone(),
        };
        (Some((segment, node_indices)), missing)
    }
}

impl Default for RoadNetworkProcessor {
    fn default() -> Self {
        Self::new(CoordinateTransformer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roads::source::OsmData;

    fn sample() -> OsmData {
        let mut data = OsmData::new();
        data.add_node(1, RawNode::new(35.2271, -80.8431));
        data.add_node(2, RawNode::new(35.2280, -80.8431));
        data.add_node(3, RawNode::new(35.2280, -80.8420));
        data.add_way(
            10,
            RawWay::new(Tags::new().with("highway", "residential"), vec![1, 2]),
        );
        data.add_way(
            11,
            RawWay::new(Tags::new().with("highway", "tertiary"), vec![2, 3]),
        );
        data.add_way(12, RawWay::new(Tags::new().with("building", "yes"), vec![1, 3]));
        data
    }

    #[test]
    fn stages_advance_in_order() {
        let data = sample();
        let mut p = RoadNetworkProcessor::default();
        assert_eq!(p.stage(), ProcessingStage::Reset);
        p.resolve_nodes(&data);
        assert_eq!(p.stage(), ProcessingStage::NodesResolved);
        p.build_segments(&data);
        assert_eq!(p.stage(), ProcessingStage::SegmentsBuilt);
        p.detect_intersections();
        assert_eq!(p.stage(), ProcessingStage::IntersectionsDetected);
        p.process(&data);
        assert_eq!(p.stage(), ProcessingStage::Ready);
        p.reset();
        assert_eq!(p.stage(), ProcessingStage::Reset);
        assert!(p.network().is_empty());
    }

    #[test]
    fn non_road_ways_are_counted() {
        let data = sample();
        let mut p = RoadNetworkProcessor::default();
        let net = p.process(&data);
        assert_eq!(net.segments.len(), 2);
        assert_eq!(net.report.ways_seen, 3);
        assert_eq!(net.report.non_road_ways, 1);
        assert_eq!(net.report.dropped_ways, 0);
    }

    #[test]
    fn build_segment_skips_unknown_nodes() {
        let data = sample();
        let mut p = RoadNetworkProcessor::default();
        p.resolve_nodes(&data);
        let tags = Tags::new().with("highway", "service");
        let seg = p.build_segment(99, &tags, &[1, 42, 2]).unwrap();
        assert_eq!(seg.coordinates.len(), 2);
        assert!(p.build_segment(100, &tags, &[1, 42]).is_none());
    }

    #[test]
    fn repeated_runs_do_not_accumulate() {
        let data = sample();
        let mut p = RoadNetworkProcessor::default();
        let first = p.process(&data).clone();
        let second = p.process(&data).clone();
        assert_eq!(first, second);
        assert_eq!(second.intersections.len(), 1);
    }

    #[test]
    fn unreferenced_nodes_do_not_claim_road_nodes() {
        let mut data = sample();
        // a building corner with a lower id placed exactly on road node 2
        data.add_node(0, RawNode::new(35.2280, -80.8431));
        let mut p = RoadNetworkProcessor::default();
        let net = p.process(&data);
        assert_eq!(net.intersections.len(), 1);
        assert_eq!(net.intersections[0].node_id, 2);
        assert!(net.node(0).unwrap().connected_segment_ids.is_empty());
        assert_eq!(net.node(2).unwrap().connected_segment_ids, vec![10, 11]);
    }

    #[test]
    fn invalid_epsilon_falls_back() {
        let p = RoadNetworkProcessor::default().with_intersection_epsilon(f64::NAN);
        assert_eq!(p.intersection_epsilon(), DEFAULT_INTERSECTION_EPSILON);
    }
}
