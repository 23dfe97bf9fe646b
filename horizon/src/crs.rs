//! Spatial references read from `.prj` (WKT) sidecars.
//!
//! Only the coordinate system name and its linear unit are extracted,
//! which is all the scan needs to validate datasets and convert
//! distances.

use crate::{units::LinearUnit, HorizonError};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialRef {
    /// Coordinate system name, e.g. `NAD_1983_HARN_Oregon_Statewide_Lambert_Feet_Intl`.
    name: String,

    /// EPSG unit-of-measure code of the linear unit, `None` for
    /// geographic coordinate systems.
    unit_code: Option<u32>,

    /// Unit name as written in the WKT, kept for error messages.
    unit_name: String,
}

impl SpatialRef {
    pub fn new(name: impl Into<String>, unit_code: Option<u32>) -> Self {
        Self {
            name: name.into(),
            unit_code,
            unit_name: unit_code.map(|c| c.to_string()).unwrap_or_default(),
        }
    }

    /// Reads the `.prj` file at `path`.
    pub fn from_prj<P: AsRef<Path>>(path: P) -> Result<Self, HorizonError> {
        let wkt = std::fs::read_to_string(path)?;
        Self::from_wkt(&wkt)
    }

    /// Parses WKT1 or ESRI WKT.
    pub fn from_wkt(wkt: &str) -> Result<Self, HorizonError> {
        let wkt = wkt.trim();
        let open = wkt
            .find('[')
            .ok_or_else(|| HorizonError::Wkt("missing '['".to_string()))?;
        let kind = wkt[..open].trim().to_ascii_uppercase();
        let name = quoted(&wkt[open..])
            .next()
            .ok_or_else(|| HorizonError::Wkt(format!("unnamed {kind}")))?
            .to_string();

        if kind.starts_with("GEOG") {
            return Ok(Self {
                name,
                unit_code: None,
                unit_name: "degree".to_string(),
            });
        }

        // The outermost unit of a projected system is its last UNIT
        // clause, the geographic datum's angular unit comes first.
        let unit = wkt
            .rfind("UNIT[")
            .map(|start| clause(&wkt[start..]))
            .ok_or_else(|| HorizonError::Wkt(format!("{name} has no UNIT")))?;
        let mut strings = quoted(unit);
        let unit_name = strings.next().unwrap_or_default().to_string();
        let unit_code = if unit.contains("AUTHORITY[") {
            strings.nth(1).and_then(|code| code.parse::<u32>().ok())
        } else {
            unit_code_from_name(&unit_name)
        };

        Ok(Self {
            name,
            unit_code,
            unit_name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_code(&self) -> Option<u32> {
        self.unit_code
    }

    /// Returns the recognized linear unit of this reference.
    ///
    /// `dataset` names the data this reference came from for error
    /// reporting.
    pub fn linear_unit(&self, dataset: &str) -> Result<LinearUnit, HorizonError> {
        self.unit_code
            .and_then(LinearUnit::from_epsg)
            .ok_or_else(|| HorizonError::LinearUnit {
                dataset: dataset.to_string(),
                unit: self.unit_name.clone(),
            })
    }

    /// Checks that `self` and `other` describe the same projection
    /// with the same recognized linear unit, and returns that unit.
    pub fn ensure_compatible(
        &self,
        dataset: &str,
        other: &Self,
        other_dataset: &str,
    ) -> Result<LinearUnit, HorizonError> {
        if self.name != other.name {
            return Err(HorizonError::Projection(
                dataset.to_string(),
                other_dataset.to_string(),
            ));
        }
        let unit = self.linear_unit(dataset)?;
        if unit != other.linear_unit(other_dataset)? {
            return Err(HorizonError::UnitMismatch(
                dataset.to_string(),
                other_dataset.to_string(),
            ));
        }
        Ok(unit)
    }
}

/// Returns the double-quoted strings in `s`, in order.
fn quoted(s: &str) -> impl Iterator<Item = &str> {
    s.split('"').skip(1).step_by(2)
}

/// Returns `s` up to and including the `]` closing its first `[`.
fn clause(s: &str) -> &str {
    let mut depth = 0_usize;
    for (idx, ch) in s.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' if depth <= 1 => return &s[..=idx],
            ']' => depth -= 1,
            _ => (),
        }
    }
    s
}

fn unit_code_from_name(name: &str) -> Option<u32> {
    let normalized: String = name
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_ascii_lowercase();
    match normalized.as_str() {
        "meter" | "metre" | "meters" | "metres" => Some(9001),
        "foot" | "feet" | "footintl" | "footinternational" | "internationalfoot" => Some(9002),
        "footus" | "ussurveyfoot" | "usfoot" => Some(9003),
        "footclarke" | "clarkesfoot" => Some(9005),
        _ => None,
    }
}
