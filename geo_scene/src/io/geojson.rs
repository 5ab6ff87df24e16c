//! GeoJSON export of a processed road network.

use std::io;

use ::geojson::feature::Id;
use ::geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;

use crate::roads::{Intersection, RoadNetwork, RoadSegment};
use crate::transform::CoordinateTransformer;

/// Builds a feature collection with one LineString per segment and one Point
/// per intersection. Positions are converted back to longitude/latitude with
/// `transformer`, which must be the one that produced the network. The
/// collection's `scene_crs` member names the UTM frame of the scene origin.
pub fn network_to_geojson(network: &RoadNetwork, transformer: &CoordinateTransformer) -> GeoJson {
    let mut features: Vec<Feature> = network
        .segments
        .iter()
        .map(|seg| segment_feature(seg, transformer))
        .collect();
    features.extend(
        network
            .intersections
            .iter()
            .map(|inter| intersection_feature(inter, transformer)),
    );
    let mut members = JsonObject::new();
    members.insert(
        "scene_crs".into(),
        json!(transformer.origin_crs().to_string()),
    );
    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(members),
    })
}

/// Writes the network as a GeoJSON file.
pub fn write_network_geojson(
    path: &str,
    network: &RoadNetwork,
    transformer: &CoordinateTransformer,
) -> io::Result<()> {
    let geojson = network_to_geojson(network, transformer);
    crate::io::write_string(path, &geojson.to_string())
}

fn segment_feature(seg: &RoadSegment, transformer: &CoordinateTransformer) -> Feature {
    let line: geo_types::LineString<f64> = seg
        .coordinates
        .iter()
        .map(|c| geo_types::Coord::from(transformer.scene_to_geo(c.x, c.y, c.z)))
        .collect();

    let mut props = JsonObject::new();
    props.insert("kind".into(), json!("road"));
    props.insert("name".into(), json!(seg.name));
    props.insert("road_type".into(), json!(seg.road_type.as_str()));
    props.insert("width".into(), json!(seg.width));
    props.insert("lanes".into(), json!(seg.lane_count));
    props.insert("surface".into(), json!(seg.surface));
    props.insert("bridge".into(), json!(seg.is_bridge));
    props.insert("tunnel".into(), json!(seg.is_tunnel));
    props.insert("oneway".into(), json!(seg.is_oneway));
    props.insert("length".into(), json!(seg.length()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::from(&line))),
        id: Some(Id::Number(seg.id.into())),
        properties: Some(props),
        foreign_members: None,
    }
}

fn intersection_feature(inter: &Intersection, transformer: &CoordinateTransformer) -> Feature {
    let p = inter.position;
    let point: geo_types::Point<f64> = transformer.scene_to_geo(p.x, p.y, p.z).into();
    let road_types: Vec<&str> = inter.road_types.iter().map(|t| t.as_str()).collect();

    let mut props = JsonObject::new();
    props.insert("kind".into(), json!("intersection"));
    props.insert("node_id".into(), json!(inter.node_id));
    props.insert("segment_ids".into(), json!(inter.segment_ids));
    props.insert("road_types".into(), json!(road_types));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::from(&point))),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}
