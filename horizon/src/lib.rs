mod azimuth;
mod config;
mod crs;
mod error;
mod math;
mod sampler;
mod scan;
mod schedule;
mod survey;
mod units;

pub use crate::{
    azimuth::{Azimuth, DirectionSet},
    config::{ScanConfig, ScanConfigBuilder},
    crs::SpatialRef,
    error::HorizonError,
    sampler::ElevationSampler,
    scan::{Node, NodeId, Probe, ScanResult, Scanner, Station},
    schedule::{increment_cells, StepSchedule},
    survey::{AngleTable, DetailRecord, NodeAngles, NodeSink, Survey},
    units::{ElevationUnit, LinearUnit},
};
pub use dem::C;
pub use geo;
