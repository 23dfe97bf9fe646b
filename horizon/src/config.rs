use crate::{
    azimuth::{Azimuth, DirectionSet},
    units::{ElevationUnit, LinearUnit},
    HorizonError, C,
};

/// Parameters of one scan run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Maximum search radius in the datasets' native linear unit.
    max_search: C,

    /// Raster cell size in the datasets' native linear unit.
    cell_size: C,

    /// Raster elevation to meters.
    elevation_to_m: C,

    /// Native linear unit to meters.
    xy_to_m: C,

    /// Scan directions, in output order.
    azimuths: Vec<Azimuth>,
}

impl ScanConfig {
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder {
            max_search_km: None,
            cell_size: None,
            elevation_unit: None,
            linear_unit: None,
            azimuths: None,
        }
    }

    pub fn max_search(&self) -> C {
        self.max_search
    }

    pub fn max_search_m(&self) -> C {
        self.max_search * self.xy_to_m
    }

    pub fn cell_size(&self) -> C {
        self.cell_size
    }

    pub fn elevation_to_m(&self) -> C {
        self.elevation_to_m
    }

    pub fn xy_to_m(&self) -> C {
        self.xy_to_m
    }

    pub fn azimuths(&self) -> &[Azimuth] {
        &self.azimuths
    }
}

pub struct ScanConfigBuilder {
    /// Maximum search radius (required).
    max_search_km: Option<C>,

    /// Raster cell size, native units (required).
    cell_size: Option<C>,

    /// Raster elevation unit (required).
    elevation_unit: Option<ElevationUnit>,

    /// Shared linear unit of nodes and raster (required).
    linear_unit: Option<LinearUnit>,

    /// Scan directions (required).
    azimuths: Option<Vec<Azimuth>>,
}

impl ScanConfigBuilder {
    /// Maximum search radius (kilometers, required).
    #[must_use]
    pub fn max_search_km(mut self, km: C) -> Self {
        self.max_search_km = Some(km);
        self
    }

    /// Raster cell size (native linear unit, required).
    #[must_use]
    pub fn cell_size(mut self, cell_size: C) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    /// Raster elevation unit (required).
    #[must_use]
    pub fn elevation_unit(mut self, unit: ElevationUnit) -> Self {
        self.elevation_unit = Some(unit);
        self
    }

    /// Linear unit shared by nodes and raster (required).
    #[must_use]
    pub fn linear_unit(mut self, unit: LinearUnit) -> Self {
        self.linear_unit = Some(unit);
        self
    }

    /// Scan toward every azimuth of `directions`.
    #[must_use]
    pub fn directions(self, directions: DirectionSet) -> Self {
        self.azimuths(directions.azimuths().iter().copied())
    }

    /// Scan toward `azimuths`, in the given order (required, unless
    /// set through `directions`).
    #[must_use]
    pub fn azimuths(mut self, azimuths: impl IntoIterator<Item = Azimuth>) -> Self {
        self.azimuths = Some(azimuths.into_iter().collect());
        self
    }

    pub fn build(&self) -> Result<ScanConfig, HorizonError> {
        let max_search_km = self
            .max_search_km
            .ok_or(HorizonError::Builder("max_search_km"))?;
        let cell_size = self.cell_size.ok_or(HorizonError::Builder("cell_size"))?;
        let elevation_unit = self
            .elevation_unit
            .ok_or(HorizonError::Builder("elevation_unit"))?;
        let linear_unit = self
            .linear_unit
            .ok_or(HorizonError::Builder("linear_unit"))?;
        let azimuths = self
            .azimuths
            .clone()
            .filter(|azimuths| !azimuths.is_empty())
            .ok_or(HorizonError::Builder("azimuths"))?;

        if !(max_search_km.is_finite() && max_search_km > 0.0) {
            return Err(HorizonError::Parameter("max_search_km", max_search_km));
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(HorizonError::Parameter("cell_size", cell_size));
        }

        let elevation_to_m = elevation_unit.to_meters()?;
        let xy_to_m = linear_unit.to_meters();

        Ok(ScanConfig {
            max_search: max_search_km * 1000.0 / xy_to_m,
            cell_size,
            elevation_to_m,
            xy_to_m,
            azimuths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Azimuth, DirectionSet, ElevationUnit, HorizonError, LinearUnit, ScanConfig};
    use approx::assert_relative_eq;

    #[test]
    fn test_build() {
        let config = ScanConfig::builder()
            .max_search_km(1.0)
            .cell_size(3.0)
            .elevation_unit(ElevationUnit::Feet)
            .linear_unit(LinearUnit::InternationalFoot)
            .directions(DirectionSet::Three)
            .build()
            .unwrap();
        assert_relative_eq!(config.max_search(), 1000.0 / 0.3048);
        assert_relative_eq!(config.max_search_m(), 1000.0, epsilon = 1e-9);
        assert_relative_eq!(config.elevation_to_m(), 0.3048);
        assert_relative_eq!(config.xy_to_m(), 0.3048);
        assert_eq!(config.cell_size(), 3.0);
        assert_eq!(
            config.azimuths(),
            &[Azimuth::West, Azimuth::South, Azimuth::East]
        );
    }

    #[test]
    fn test_missing_parameters() {
        let builder = ScanConfig::builder()
            .max_search_km(1.0)
            .elevation_unit(ElevationUnit::Meters)
            .linear_unit(LinearUnit::Meter)
            .directions(DirectionSet::Seven);
        assert!(matches!(
            builder.build(),
            Err(HorizonError::Builder("cell_size"))
        ));
        let builder = builder.cell_size(1.0).azimuths([]);
        assert!(matches!(
            builder.build(),
            Err(HorizonError::Builder("azimuths"))
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        let builder = || {
            ScanConfig::builder()
                .max_search_km(1.0)
                .cell_size(10.0)
                .elevation_unit(ElevationUnit::Meters)
                .linear_unit(LinearUnit::Meter)
                .directions(DirectionSet::Three)
        };
        assert!(builder().build().is_ok());
        assert!(matches!(
            builder().elevation_unit(ElevationUnit::Other).build(),
            Err(HorizonError::ElevationUnit)
        ));
        assert!(matches!(
            builder().max_search_km(0.0).build(),
            Err(HorizonError::Parameter("max_search_km", _))
        ));
        assert!(matches!(
            builder().cell_size(f64::NAN).build(),
            Err(HorizonError::Parameter("cell_size", _))
        ));
    }
}
