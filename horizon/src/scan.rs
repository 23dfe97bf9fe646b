//! Per node, per azimuth horizon scan.

use crate::{
    azimuth::Azimuth, config::ScanConfig, math::horizon_angle, sampler::ElevationSampler,
    schedule::StepSchedule, HorizonError, C,
};
use geo::geometry::Coord;

/// Unique, stable node key.
pub type NodeId = i64;

/// A survey node in the node dataset's native coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub coord: Coord<C>,
}

impl Node {
    pub fn new(id: NodeId, coord: Coord<C>) -> Self {
        Self { id, coord }
    }

    /// Samples this node's own elevation.
    ///
    /// A node without elevation has no baseline to measure angles
    /// from, which is fatal for the whole run.
    pub fn resolve<S>(&self, sampler: &S, config: &ScanConfig) -> Result<Station, HorizonError>
    where
        S: ElevationSampler + ?Sized,
    {
        let elevation = sampler
            .sample(self.coord)
            .ok_or(HorizonError::NodeElevation {
                id: self.id,
                x: self.coord.x,
                y: self.coord.y,
            })?;
        Ok(Station {
            node: *self,
            elevation_m: elevation * config.elevation_to_m(),
        })
    }
}

/// A node with its resolved elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    pub node: Node,
    pub elevation_m: C,
}

/// One raster lookup along a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    /// Distance from the node, native units.
    pub distance: C,

    pub coord: Coord<C>,

    /// Native elevation, `None` when off the raster.
    pub elevation: Option<C>,
}

/// Outcome of scanning one azimuth from one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanResult {
    pub azimuth: Azimuth,

    /// Highest horizon angle seen, degrees. Zero if terrain never
    /// rose above the node.
    pub angle_deg: C,

    /// Elevation at the peak, node elevation if there's no peak.
    pub peak_elevation_m: C,

    pub node_elevation_m: C,

    /// `peak_elevation_m - node_elevation_m`.
    pub elevation_change_m: C,

    /// Distance from node to peak, 0 if there's no peak.
    pub peak_distance_m: C,

    /// Configured search radius.
    pub search_distance_m: C,

    /// Number of probes without elevation data.
    pub off_raster: usize,

    /// Peak location, the node's if there's no peak.
    pub peak: Coord<C>,
}

impl ScanResult {
    /// A scan that hasn't found anything above the node yet.
    fn level(station: &Station, azimuth: Azimuth, search_distance_m: C) -> Self {
        Self {
            azimuth,
            angle_deg: 0.0,
            peak_elevation_m: station.elevation_m,
            node_elevation_m: station.elevation_m,
            elevation_change_m: 0.0,
            peak_distance_m: 0.0,
            search_distance_m,
            off_raster: 0,
            peak: station.node.coord,
        }
    }

    /// Folds `probe` into the running maximum.
    fn observe(mut self, probe: Probe, config: &ScanConfig) -> Self {
        let Some(elevation) = probe.elevation else {
            self.off_raster += 1;
            return self;
        };
        let elevation_m = elevation * config.elevation_to_m();
        let distance_m = probe.distance * config.xy_to_m();
        let angle_deg = horizon_angle(self.node_elevation_m, distance_m, elevation_m);
        if angle_deg > self.angle_deg {
            self.angle_deg = angle_deg;
            self.peak_elevation_m = elevation_m;
            self.elevation_change_m = elevation_m - self.node_elevation_m;
            self.peak_distance_m = distance_m;
            self.peak = probe.coord;
        }
        self
    }
}

pub struct Scanner<'a, S: ?Sized> {
    config: &'a ScanConfig,
    sampler: &'a S,
}

impl<'a, S> Scanner<'a, S>
where
    S: ElevationSampler + ?Sized,
{
    pub fn new(config: &'a ScanConfig, sampler: &'a S) -> Self {
        Self { config, sampler }
    }

    /// Lazily probes the raster outward from `origin` toward
    /// `azimuth`.
    pub fn probes(&self, origin: Coord<C>, azimuth: Azimuth) -> impl Iterator<Item = Probe> + 'a {
        let (dx, dy) = azimuth.unit_step();
        let sampler = self.sampler;
        StepSchedule::new(self.config.cell_size(), self.config.max_search()).map(move |distance| {
            let coord = Coord {
                x: origin.x + distance * dx,
                y: origin.y + distance * dy,
            };
            Probe {
                distance,
                coord,
                elevation: sampler.sample(coord),
            }
        })
    }

    pub fn scan(&self, station: &Station, azimuth: Azimuth) -> ScanResult {
        let level = ScanResult::level(station, azimuth, self.config.max_search_m());
        self.probes(station.node.coord, azimuth)
            .fold(level, |best, probe| best.observe(probe, self.config))
    }
}
