use crate::C;
use serde::Serialize;
use std::{fmt, str::FromStr};

/// Compass bearing of a scan, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Azimuth {
    #[serde(rename = "NE")]
    NorthEast,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "SE")]
    SouthEast,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "SW")]
    SouthWest,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "NW")]
    NorthWest,
}

impl Azimuth {
    pub fn degrees(self) -> C {
        match self {
            Self::NorthEast => 45.0,
            Self::East => 90.0,
            Self::SouthEast => 135.0,
            Self::South => 180.0,
            Self::SouthWest => 225.0,
            Self::West => 270.0,
            Self::NorthWest => 315.0,
        }
    }

    /// Short compass label, e.g. `"SW"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        }
    }

    /// Name of the node attribute holding the angle toward this
    /// azimuth.
    pub fn field_name(self) -> String {
        format!("TOPO_{}", self.label())
    }

    /// Returns the (x, y) unit step toward this azimuth.
    pub fn unit_step(self) -> (C, C) {
        let (sin, cos) = self.degrees().to_radians().sin_cos();
        (sin, cos)
    }
}

impl fmt::Display for Azimuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two supported sets of scan directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionSet {
    /// West, south and east.
    #[default]
    Three,

    /// Every 45° except north.
    Seven,
}

impl DirectionSet {
    /// Returns this set's azimuths in scan order.
    pub fn azimuths(self) -> &'static [Azimuth] {
        use Azimuth::*;
        match self {
            Self::Three => &[West, South, East],
            Self::Seven => &[
                NorthEast, East, SouthEast, South, SouthWest, West, NorthWest,
            ],
        }
    }
}

impl FromStr for DirectionSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "3" => Ok(Self::Three),
            "7" => Ok(Self::Seven),
            _ => Err(format!("{s} directions is not supported, use 3 or 7")),
        }
    }
}

impl fmt::Display for DirectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.azimuths().len())
    }
}
