use crate::C;
use dem::Grid;
use geo::geometry::Coord;

/// A source of raster elevations.
///
/// Coordinates and elevations are in the raster's native units.
pub trait ElevationSampler {
    /// Returns the elevation at `coord`, `None` when there is no data.
    fn sample(&self, coord: Coord<C>) -> Option<C>;

    /// Returns the raster cell size.
    fn cell_size(&self) -> C;
}

impl ElevationSampler for Grid {
    fn sample(&self, coord: Coord<C>) -> Option<C> {
        self.get(coord).map(C::from)
    }

    fn cell_size(&self) -> C {
        Grid::cell_size(self)
    }
}
