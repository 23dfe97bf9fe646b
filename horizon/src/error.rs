use crate::NodeId;
use dem::DemError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HorizonError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("invalid {0} {1}")]
    Parameter(&'static str, f64),

    #[error("{dataset} has an unrecognized spatial reference unit ({unit}), use a projection with units of feet or meters")]
    LinearUnit { dataset: String, unit: String },

    #[error("unsupported elevation units, modify your raster elevation units to feet or meters")]
    ElevationUnit,

    #[error("{0} and {1} do not have the same projection, please reproject your data")]
    Projection(String, String),

    #[error("{0} and {1} do not have the same linear unit, please reproject your data")]
    UnitMismatch(String, String),

    #[error("invalid spatial reference, {0}")]
    Wkt(String),

    #[error("no elevation to sample at node {id} ({x}, {y}), check your elevation raster and the spatial coordinates of your input data")]
    NodeElevation { id: NodeId, x: f64, y: f64 },

    #[error("failed to write angles for node {0}, {1}")]
    Sink(NodeId, String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Dem(#[from] DemError),
}
