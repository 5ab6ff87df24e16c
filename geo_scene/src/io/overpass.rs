//! Reader for Overpass API JSON responses (`[out:json]`).

use std::collections::BTreeMap;
use std::io;

use serde::Deserialize;

use crate::roads::{OsmData, RawNode, RawWay, Tags};

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Element {
    Node {
        id: u64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    Way {
        id: u64,
        #[serde(default)]
        nodes: Vec<u64>,
        #[serde(default)]
        tags: BTreeMap<String, String>,
    },
    #[serde(other)]
    Other,
}

/// Parses an Overpass JSON document into node and way maps. Relations and
/// other element kinds are skipped.
pub fn parse_overpass_json(text: &str) -> io::Result<OsmData> {
    let response: Response = serde_json::from_str(text)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mut data = OsmData::new();
    for element in response.elements {
        match element {
            Element::Node { id, lat, lon, tags } => data.add_node(
                id,
                RawNode {
                    lat,
                    lon,
                    tags: Tags::from(tags),
                },
            ),
            Element::Way { id, nodes, tags } => data.add_way(id, RawWay::new(Tags::from(tags), nodes)),
            Element::Other => {}
        }
    }
    Ok(data)
}

/// Reads an Overpass JSON file.
pub fn read_overpass_json(path: &str) -> io::Result<OsmData> {
    let text = crate::io::read_to_string(path)?;
    parse_overpass_json(&text)
}
