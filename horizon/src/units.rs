//! Linear and elevation unit conversion factors.

use crate::{HorizonError, C};
use std::{fmt, str::FromStr};

/// Linear units of a projected coordinate system, identified by their
/// EPSG unit-of-measure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearUnit {
    /// EPSG 9001.
    Meter,
    /// EPSG 9002.
    InternationalFoot,
    /// EPSG 9003.
    UsSurveyFoot,
    /// EPSG 9005.
    ClarkeFoot,
}

impl LinearUnit {
    pub fn from_epsg(code: u32) -> Option<Self> {
        match code {
            9001 => Some(Self::Meter),
            9002 => Some(Self::InternationalFoot),
            9003 => Some(Self::UsSurveyFoot),
            9005 => Some(Self::ClarkeFoot),
            _ => None,
        }
    }

    pub fn epsg(self) -> u32 {
        match self {
            Self::Meter => 9001,
            Self::InternationalFoot => 9002,
            Self::UsSurveyFoot => 9003,
            Self::ClarkeFoot => 9005,
        }
    }

    /// Returns the factor converting this unit to meters.
    pub fn to_meters(self) -> C {
        match self {
            Self::Meter => 1.0,
            Self::InternationalFoot => 0.3048,
            Self::UsSurveyFoot => 1200.0 / 3937.0,
            Self::ClarkeFoot => 0.304_797_265_4,
        }
    }
}

/// Vertical units of raster elevation samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationUnit {
    Feet,
    Meters,
    /// Anything else, always rejected.
    Other,
}

impl ElevationUnit {
    /// Returns the factor converting elevation samples to meters.
    pub fn to_meters(self) -> Result<C, HorizonError> {
        match self {
            Self::Feet => Ok(0.3048),
            Self::Meters => Ok(1.0),
            Self::Other => Err(HorizonError::ElevationUnit),
        }
    }
}

impl FromStr for ElevationUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "feet" | "foot" | "ft" => Ok(Self::Feet),
            "meters" | "meter" | "metres" | "metre" | "m" => Ok(Self::Meters),
            "other" => Ok(Self::Other),
            _ => Err(format!("{s} is not one of feet, meters, other")),
        }
    }
}

impl fmt::Display for ElevationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Feet => "feet",
            Self::Meters => "meters",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::{ElevationUnit, HorizonError, LinearUnit};
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_unit_codes() {
        for code in [9001, 9002, 9003, 9005] {
            assert_eq!(LinearUnit::from_epsg(code).unwrap().epsg(), code);
        }
        assert_eq!(LinearUnit::from_epsg(9004), None);
        assert_eq!(LinearUnit::from_epsg(9122), None);
    }

    #[test]
    fn test_linear_unit_to_meters() {
        assert_relative_eq!(LinearUnit::Meter.to_meters(), 1.0);
        assert_relative_eq!(LinearUnit::InternationalFoot.to_meters(), 0.3048);
        assert_relative_eq!(
            LinearUnit::UsSurveyFoot.to_meters(),
            0.304_800_609_601_219_2,
            epsilon = 1e-15
        );
        assert_relative_eq!(LinearUnit::ClarkeFoot.to_meters(), 0.304_797_265_4);
    }

    #[test]
    fn test_elevation_unit() {
        assert_relative_eq!(ElevationUnit::Feet.to_meters().unwrap(), 0.3048);
        assert_relative_eq!(ElevationUnit::Meters.to_meters().unwrap(), 1.0);
        assert!(matches!(
            ElevationUnit::Other.to_meters(),
            Err(HorizonError::ElevationUnit)
        ));
        assert_eq!("Feet".parse::<ElevationUnit>(), Ok(ElevationUnit::Feet));
        assert_eq!("meters".parse::<ElevationUnit>(), Ok(ElevationUnit::Meters));
        assert!("furlongs".parse::<ElevationUnit>().is_err());
    }
}
