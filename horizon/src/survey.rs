//! Scans every node toward every configured azimuth.

use crate::{
    azimuth::Azimuth,
    config::ScanConfig,
    sampler::ElevationSampler,
    scan::{Node, NodeId, ScanResult, Scanner, Station},
    HorizonError, C,
};
use dashmap::DashMap;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

/// Angles toward each scanned azimuth for one node, in scan order.
pub type NodeAngles = Vec<(Azimuth, C)>;

/// Receives each node's angles as soon as its scans are complete.
///
/// Nodes are scanned concurrently, so implementations are called from
/// multiple threads, but never twice for the same node in a run.
pub trait NodeSink: Sync {
    fn write_node(&self, id: NodeId, angles: &[(Azimuth, C)]) -> Result<(), HorizonError>;
}

/// In-memory node angle attributes.
#[derive(Debug, Default)]
pub struct AngleTable {
    angles: DashMap<NodeId, NodeAngles>,
}

impl AngleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the angles written for node `id`, if any.
    pub fn get(&self, id: NodeId) -> Option<NodeAngles> {
        self.angles.get(&id).map(|angles| angles.value().clone())
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }
}

impl NodeSink for AngleTable {
    fn write_node(&self, id: NodeId, angles: &[(Azimuth, C)]) -> Result<(), HorizonError> {
        self.angles.insert(id, angles.to_vec());
        Ok(())
    }
}

/// One exported record per (node, azimuth), located at the peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetailRecord {
    #[serde(rename = "NODE_ID")]
    pub node_id: NodeId,

    #[serde(rename = "AZIMUTH")]
    pub azimuth: Azimuth,

    #[serde(rename = "TOPOANGLE")]
    pub angle_deg: C,

    #[serde(rename = "TOPO_ELE")]
    pub peak_elevation_m: C,

    #[serde(rename = "NODE_ELE")]
    pub node_elevation_m: C,

    #[serde(rename = "ELE_CHANGE")]
    pub elevation_change_m: C,

    #[serde(rename = "DISTANCE_m")]
    pub peak_distance_m: C,

    #[serde(rename = "SEARCH_m")]
    pub search_distance_m: C,

    #[serde(rename = "NA_SAMPLES")]
    pub off_raster: usize,

    #[serde(rename = "POINT_X")]
    pub x: C,

    #[serde(rename = "POINT_Y")]
    pub y: C,
}

impl DetailRecord {
    /// Field names, in export order.
    pub const FIELDS: [&'static str; 11] = [
        "NODE_ID",
        "AZIMUTH",
        "TOPOANGLE",
        "TOPO_ELE",
        "NODE_ELE",
        "ELE_CHANGE",
        "DISTANCE_m",
        "SEARCH_m",
        "NA_SAMPLES",
        "POINT_X",
        "POINT_Y",
    ];

    pub fn new(node_id: NodeId, result: &ScanResult) -> Self {
        Self {
            node_id,
            azimuth: result.azimuth,
            angle_deg: result.angle_deg,
            peak_elevation_m: result.peak_elevation_m,
            node_elevation_m: result.node_elevation_m,
            elevation_change_m: result.elevation_change_m,
            peak_distance_m: result.peak_distance_m,
            search_distance_m: result.search_distance_m,
            off_raster: result.off_raster,
            x: result.peak.x,
            y: result.peak.y,
        }
    }
}

pub struct Survey<'a, S: ?Sized> {
    config: &'a ScanConfig,
    sampler: &'a S,
}

impl<'a, S> Survey<'a, S>
where
    S: ElevationSampler + Sync + ?Sized,
{
    pub fn new(config: &'a ScanConfig, sampler: &'a S) -> Self {
        Self { config, sampler }
    }

    /// Scans `nodes`, writing each node's angles to `sink`, and
    /// returns every detail record in node then azimuth order.
    ///
    /// All node elevations are resolved up front, a node without
    /// elevation fails the run before anything is written.
    pub fn run<K>(&self, nodes: &[Node], sink: &K) -> Result<Vec<DetailRecord>, HorizonError>
    where
        K: NodeSink + ?Sized,
    {
        let now = std::time::Instant::now();

        let stations = nodes
            .iter()
            .map(|node| node.resolve(self.sampler, self.config))
            .collect::<Result<Vec<Station>, HorizonError>>()?;

        let scanner = Scanner::new(self.config, self.sampler);
        let records = stations
            .par_iter()
            .map(|station| self.scan_station(&scanner, station, sink))
            .collect::<Result<Vec<Vec<DetailRecord>>, HorizonError>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<DetailRecord>>();

        info!(
            "scanned {} nodes toward {} azimuths in {:?}",
            nodes.len(),
            self.config.azimuths().len(),
            now.elapsed()
        );

        Ok(records)
    }

    fn scan_station<K>(
        &self,
        scanner: &Scanner<'_, S>,
        station: &Station,
        sink: &K,
    ) -> Result<Vec<DetailRecord>, HorizonError>
    where
        K: NodeSink + ?Sized,
    {
        let now = std::time::Instant::now();
        let results: Vec<ScanResult> = self
            .config
            .azimuths()
            .iter()
            .map(|&azimuth| scanner.scan(station, azimuth))
            .collect();

        let angles: NodeAngles = results
            .iter()
            .map(|result| (result.azimuth, result.angle_deg))
            .collect();
        sink.write_node(station.node.id, &angles)?;

        let off_raster: usize = results.iter().map(|result| result.off_raster).sum();
        if off_raster > 0 {
            warn!(
                "node {}; {} samples without elevation, angles may be underestimated",
                station.node.id, off_raster
            );
        }
        debug!(
            "node {}; elevation: {} m, off_raster: {}, exec: {:?}",
            station.node.id,
            station.elevation_m,
            off_raster,
            now.elapsed()
        );

        Ok(results
            .iter()
            .map(|result| DetailRecord::new(station.node.id, result))
            .collect())
    }
}
