use clap::{Parser, ValueEnum};
use dem::GridMode;
use horizon::{DirectionSet, ElevationUnit};
use std::path::PathBuf;

/// Compute topographic shade angles around survey nodes.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Survey nodes, a GeoJSON FeatureCollection of points with a
    /// numeric NODE_ID property.
    #[arg(short, long)]
    pub nodes: PathBuf,

    /// Elevation raster, an ESRI ASCII (.asc) or float (.flt) grid.
    #[arg(short, long)]
    pub dem: PathBuf,

    /// Number of directions to scan, 3 (W, S, E) or 7 (every 45° but
    /// north).
    #[arg(long, default_value_t = DirectionSet::Three)]
    pub directions: DirectionSet,

    /// Maximum search distance, in kilometers.
    #[arg(short, long, default_value_t = 1.0)]
    pub max_search_km: f64,

    /// Elevation raster vertical units: feet, meters or other.
    #[arg(short, long)]
    pub elevation_units: ElevationUnit,

    /// Detail records output file.
    #[arg(short, long)]
    pub out: PathBuf,

    /// Detail records output format.
    #[arg(short, long, value_enum, default_value_t = Format::Geojson)]
    pub format: Format,

    /// Node spatial reference, defaults to the nodes' sibling .prj.
    #[arg(long)]
    pub node_prj: Option<PathBuf>,

    /// Raster spatial reference, defaults to the raster's sibling .prj.
    #[arg(long)]
    pub dem_prj: Option<PathBuf>,

    /// How to load raster samples.
    #[arg(long, value_enum, default_value_t = Mode::InMem)]
    pub grid_mode: Mode,

    /// Number of scanning threads, defaults to one per core.
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Write nodes with their angles here instead of updating the
    /// nodes file in place.
    #[arg(long)]
    pub nodes_out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// FeatureCollection of points at each peak.
    Geojson,

    /// Comma separated values with a header row.
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Parse samples into memory.
    InMem,

    /// Memory map float grids.
    MemMap,
}

impl From<Mode> for GridMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::InMem => GridMode::InMem,
            Mode::MemMap => GridMode::MemMap,
        }
    }
}

impl Cli {
    pub fn node_prj(&self) -> PathBuf {
        self.node_prj
            .clone()
            .unwrap_or_else(|| self.nodes.with_extension("prj"))
    }

    pub fn dem_prj(&self) -> PathBuf {
        self.dem_prj
            .clone()
            .unwrap_or_else(|| self.dem.with_extension("prj"))
    }

    pub fn nodes_out(&self) -> PathBuf {
        self.nodes_out.clone().unwrap_or_else(|| self.nodes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Format, Mode};
    use clap::{CommandFactory, Parser};
    use horizon::{DirectionSet, ElevationUnit};
    use std::path::Path;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from([
            "topo",
            "--nodes",
            "data/nodes.geojson",
            "--dem",
            "data/dem.flt",
            "--elevation-units",
            "feet",
            "--out",
            "out/details.geojson",
        ])
        .unwrap();
        assert_eq!(cli.directions, DirectionSet::Three);
        assert_eq!(cli.max_search_km, 1.0);
        assert_eq!(cli.elevation_units, ElevationUnit::Feet);
        assert_eq!(cli.format, Format::Geojson);
        assert_eq!(cli.grid_mode, Mode::InMem);
        assert_eq!(cli.node_prj(), Path::new("data/nodes.prj"));
        assert_eq!(cli.dem_prj(), Path::new("data/dem.prj"));
        assert_eq!(cli.nodes_out(), Path::new("data/nodes.geojson"));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "topo",
            "-n",
            "nodes.geojson",
            "-d",
            "dem.asc",
            "-e",
            "meters",
            "-o",
            "details.csv",
            "--format",
            "csv",
            "--directions",
            "7",
            "--max-search-km",
            "2.5",
            "--grid-mode",
            "mem-map",
            "--dem-prj",
            "elsewhere/dem.prj",
            "--nodes-out",
            "nodes_topo.geojson",
        ])
        .unwrap();
        assert_eq!(cli.directions, DirectionSet::Seven);
        assert_eq!(cli.max_search_km, 2.5);
        assert_eq!(cli.format, Format::Csv);
        assert_eq!(cli.grid_mode, Mode::MemMap);
        assert_eq!(cli.dem_prj(), Path::new("elsewhere/dem.prj"));
        assert_eq!(cli.nodes_out(), Path::new("nodes_topo.geojson"));
        assert!(Cli::try_parse_from([
            "topo", "-n", "a", "-d", "b", "-e", "m", "-o", "c", "--directions", "4"
        ])
        .is_err());
    }
}
