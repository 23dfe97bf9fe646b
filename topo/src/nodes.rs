//! Survey node GeoJSON input and angle write-back.

use anyhow::{anyhow, bail, Result};
use geojson::{FeatureCollection, GeoJson, Value};
use horizon::{geo::geometry::Coord, AngleTable, Node, NodeId};
use crate::staged::Staged;
use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

pub const ID_PROPERTY: &str = "NODE_ID";

/// Node features along with the nodes parsed from them.
pub struct NodeFile {
    collection: FeatureCollection,
    nodes: Vec<Node>,
}

impl NodeFile {
    pub fn open(path: &Path) -> Result<Self> {
        let rdr = BufReader::new(File::open(path)?);
        let GeoJson::FeatureCollection(collection) = GeoJson::from_reader(rdr)? else {
            bail!("{} is not a FeatureCollection", path.display());
        };
        Self::from_collection(collection)
    }

    pub fn from_collection(collection: FeatureCollection) -> Result<Self> {
        let mut ids = HashSet::with_capacity(collection.features.len());
        let mut nodes = Vec::with_capacity(collection.features.len());
        for (idx, feature) in collection.features.iter().enumerate() {
            let id = feature
                .property(ID_PROPERTY)
                .and_then(node_id)
                .ok_or_else(|| anyhow!("feature {idx} has no integer {ID_PROPERTY}"))?;
            if !ids.insert(id) {
                bail!("duplicate {ID_PROPERTY} {id}");
            }
            let coord = match feature.geometry.as_ref().map(|geometry| &geometry.value) {
                Some(Value::Point(position)) if position.len() >= 2 => Coord {
                    x: position[0],
                    y: position[1],
                },
                _ => bail!("node {id} is not a point"),
            };
            nodes.push(Node::new(id, coord));
        }
        Ok(Self { collection, nodes })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Sets a `TOPO_<azimuth>` property on every node in `table`.
    pub fn set_angles(&mut self, table: &AngleTable) {
        for (feature, node) in self.collection.features.iter_mut().zip(&self.nodes) {
            for (azimuth, angle) in table.get(node.id).into_iter().flatten() {
                feature.set_property(azimuth.field_name(), angle);
            }
        }
    }

    /// Writes the node features to a temporary file that replaces
    /// `path` once committed, so `path` may be the file these nodes
    /// were read from.
    pub fn stage(&self, path: &Path) -> Result<Staged> {
        Staged::write(path, |wtr| Ok(serde_json::to_writer(wtr, &self.collection)?))
    }
}

/// Reads an integer id, also accepting integral doubles such as `7.0`.
#[allow(clippy::cast_possible_truncation)]
fn node_id(value: &serde_json::Value) -> Option<NodeId> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|id| id.fract() == 0.0 && id.abs() < 9.0e15)
            .map(|id| id as NodeId)
    })
}

#[cfg(test)]
mod tests {
    use super::NodeFile;
    use crate::staged::tmp_path;
    use geojson::{FeatureCollection, GeoJson};
    use horizon::{AngleTable, Azimuth, NodeId, NodeSink};
    use std::{env, fs};

    const NODES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [1000.0, 2000.0] },
                "properties": { "NODE_ID": 7, "SITE": "upper" }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [1500.0, 2500.0] },
                "properties": { "NODE_ID": 9 }
            }
        ]
    }"#;

    fn collection(json: &str) -> FeatureCollection {
        match json.parse::<GeoJson>().unwrap() {
            GeoJson::FeatureCollection(collection) => collection,
            _ => unreachable!(),
        }
    }

    fn angle(file: &NodeFile, id: NodeId, field: &str) -> Option<f64> {
        let idx = file.nodes.iter().position(|node| node.id == id)?;
        file.collection.features[idx]
            .property(field)
            .and_then(serde_json::Value::as_f64)
    }

    #[test]
    fn test_parse_nodes() {
        let file = NodeFile::from_collection(collection(NODES)).unwrap();
        let nodes = file.nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id, 7);
        assert_eq!(nodes[0].coord.x, 1000.0);
        assert_eq!(nodes[1].coord.y, 2500.0);
    }

    #[test]
    fn test_double_node_ids() {
        let doubles = NODES
            .replace(r#""NODE_ID": 7"#, r#""NODE_ID": 7.0"#)
            .replace(r#""NODE_ID": 9"#, r#""NODE_ID": 9.0"#);
        let file = NodeFile::from_collection(collection(&doubles)).unwrap();
        let ids: Vec<NodeId> = file.nodes().iter().map(|node| node.id).collect();
        assert_eq!(ids, [7, 9]);
    }

    #[test]
    fn test_invalid_nodes() {
        let missing_id = NODES.replace(r#""NODE_ID": 9"#, r#""NAME": "x""#);
        assert!(NodeFile::from_collection(collection(&missing_id)).is_err());

        let fractional = NODES.replace(r#""NODE_ID": 9"#, r#""NODE_ID": 9.5"#);
        assert!(NodeFile::from_collection(collection(&fractional)).is_err());

        let duplicate = NODES.replace(r#""NODE_ID": 9"#, r#""NODE_ID": 7"#);
        assert!(NodeFile::from_collection(collection(&duplicate)).is_err());

        let line = NODES.replace(
            r#"{ "type": "Point", "coordinates": [1500.0, 2500.0] }"#,
            r#"{ "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] }"#,
        );
        assert!(NodeFile::from_collection(collection(&line)).is_err());
    }

    #[test]
    fn test_write_back_in_place() {
        let path = env::temp_dir().join(format!("topo-nodes-{}.geojson", std::process::id()));
        fs::write(&path, NODES).unwrap();

        let mut file = NodeFile::open(&path).unwrap();
        let table = AngleTable::new();
        table
            .write_node(7, &[(Azimuth::West, 12.5), (Azimuth::East, 0.0)])
            .unwrap();
        table.write_node(9, &[(Azimuth::West, 3.0)]).unwrap();
        file.set_angles(&table);
        file.stage(&path).unwrap().commit().unwrap();

        let reread = NodeFile::open(&path).unwrap();
        assert_eq!(angle(&reread, 7, "TOPO_W"), Some(12.5));
        assert_eq!(angle(&reread, 7, "TOPO_E"), Some(0.0));
        assert_eq!(angle(&reread, 9, "TOPO_W"), Some(3.0));
        assert_eq!(angle(&reread, 9, "TOPO_E"), None);
        assert_eq!(reread.nodes(), file.nodes());
        assert!(!tmp_path(&path).exists());
        fs::remove_file(path).unwrap();
    }
}
